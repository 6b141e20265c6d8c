// ABOUTME: Crime event aggregation for the map's safety overlay
// ABOUTME: Counts recent events per type within the look-back window
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use chrono::{DateTime, Duration, Utc};
use sqlx::Row;

use super::Database;
use crate::constants::limits;
use crate::errors::AppResult;
use crate::models::CrimeStat;

impl Database {
    pub(super) async fn migrate_crime(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS crime_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                zipcode TEXT NOT NULL,
                event_type TEXT NOT NULL,
                occurred_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_crime_zip_time ON crime_events (zipcode, occurred_at)",
        )
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Aggregate recent crime events for a ZIP code.
    ///
    /// Counts events per type within the last [`limits::CRIME_WINDOW_DAYS`]
    /// days, keeping only types seen more than
    /// [`limits::CRIME_MIN_EVENT_COUNT`] times, most frequent first. The
    /// cutoff is computed here and bound as a parameter so it works the same
    /// on every backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn crime_stats(&self, zipcode: &str) -> AppResult<Vec<CrimeStat>> {
        let cutoff: DateTime<Utc> = Utc::now() - Duration::days(limits::CRIME_WINDOW_DAYS);

        let rows = sqlx::query(
            r"
            SELECT event_type, COUNT(*) AS event_count
            FROM crime_events
            WHERE zipcode = ? AND occurred_at >= ?
            GROUP BY event_type
            HAVING COUNT(*) > ?
            ORDER BY event_count DESC
            ",
        )
        .bind(zipcode)
        .bind(cutoff)
        .bind(limits::CRIME_MIN_EVENT_COUNT)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(CrimeStat {
                    event_type: row.try_get("event_type")?,
                    event_count: row.try_get("event_count")?,
                })
            })
            .collect()
    }

    /// Insert one crime event (data loading and tests)
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_crime_event(
        &self,
        zipcode: &str,
        event_type: &str,
        occurred_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query("INSERT INTO crime_events (zipcode, event_type, occurred_at) VALUES (?, ?, ?)")
            .bind(zipcode)
            .bind(event_type)
            .bind(occurred_at)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
