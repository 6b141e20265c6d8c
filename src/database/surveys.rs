// ABOUTME: Happiness survey storage and community comment lookups
// ABOUTME: Inserts user submissions and lists comments per ZIP code
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use chrono::{DateTime, Utc};
use sqlx::Row;

use super::Database;
use crate::errors::AppResult;
use crate::models::{NewSurvey, SurveyComment};

impl Database {
    pub(super) async fn migrate_surveys(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS happiness_surveys (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_email TEXT NOT NULL,
                zipcode TEXT NOT NULL,
                rating INTEGER NOT NULL,
                comment TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_surveys_zipcode ON happiness_surveys (zipcode)",
        )
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Store a submitted survey
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_survey(&self, survey: &NewSurvey) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO happiness_surveys (user_email, zipcode, rating, comment, created_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(&survey.user_email)
        .bind(&survey.zipcode)
        .bind(survey.rating)
        .bind(&survey.comment)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// List non-empty survey comments for a ZIP code, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn comments_for_zipcode(&self, zipcode: &str) -> AppResult<Vec<SurveyComment>> {
        let rows = sqlx::query(
            r"
            SELECT comment, created_at FROM happiness_surveys
            WHERE zipcode = ? AND comment IS NOT NULL AND comment != ''
            ORDER BY created_at DESC
            ",
        )
        .bind(zipcode)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(SurveyComment {
                    comment: row.try_get("comment")?,
                    created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
                })
            })
            .collect()
    }
}
