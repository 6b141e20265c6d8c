// ABOUTME: Precomputed happiness score lookups per ZIP code
// ABOUTME: Read-only access; scores are written by the scoring procedures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use sqlx::Row;

use super::Database;
use crate::errors::AppResult;
use crate::models::ComponentScores;

impl Database {
    pub(super) async fn migrate_scores(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS zip_scores (
                zipcode TEXT PRIMARY KEY,
                total_happiness_score REAL NOT NULL,
                economic_wellbeing_score REAL NOT NULL,
                family_and_relationships_score REAL NOT NULL,
                physical_and_mental_wellbeing_score REAL NOT NULL,
                environmental_and_societal_wellness_score REAL NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Insert or replace the scores for a ZIP code (data loading and tests)
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails
    pub async fn upsert_scores(
        &self,
        zipcode: &str,
        scores: &ComponentScores,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT OR REPLACE INTO zip_scores (zipcode, total_happiness_score,
                economic_wellbeing_score, family_and_relationships_score,
                physical_and_mental_wellbeing_score,
                environmental_and_societal_wellness_score)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(zipcode)
        .bind(scores.total_happiness_score)
        .bind(scores.economic_wellbeing_score)
        .bind(scores.family_and_relationships_score)
        .bind(scores.physical_and_mental_wellbeing_score)
        .bind(scores.environmental_and_societal_wellness_score)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Fetch the component scores for a ZIP code, if it has been scored
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_scores(&self, zipcode: &str) -> AppResult<Option<ComponentScores>> {
        let row = sqlx::query(
            r"
            SELECT total_happiness_score,
                   economic_wellbeing_score,
                   family_and_relationships_score,
                   physical_and_mental_wellbeing_score,
                   environmental_and_societal_wellness_score
            FROM zip_scores WHERE zipcode = ?
            ",
        )
        .bind(zipcode)
        .fetch_optional(self.pool())
        .await?;

        row.map(|row| {
            Ok(ComponentScores {
                total_happiness_score: row.try_get("total_happiness_score")?,
                economic_wellbeing_score: row.try_get("economic_wellbeing_score")?,
                family_and_relationships_score: row.try_get("family_and_relationships_score")?,
                physical_and_mental_wellbeing_score: row
                    .try_get("physical_and_mental_wellbeing_score")?,
                environmental_and_societal_wellness_score: row
                    .try_get("environmental_and_societal_wellness_score")?,
            })
        })
        .transpose()
    }
}
