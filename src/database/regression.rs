// ABOUTME: Regression coefficient storage for the scoring model
// ABOUTME: Admin-tuned parameters keyed by target component score
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::Database;
use crate::errors::AppResult;

impl Database {
    pub(super) async fn migrate_regression(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS regression_parameters (
                target_component TEXT PRIMARY KEY,
                population_param REAL NOT NULL DEFAULT 0,
                population_density_param REAL NOT NULL DEFAULT 0,
                median_age_param REAL NOT NULL DEFAULT 0,
                share_of_married_param REAL NOT NULL DEFAULT 0,
                avg_family_size_param REAL NOT NULL DEFAULT 0,
                unemployment_rate_param REAL NOT NULL DEFAULT 0,
                household_median_income_param REAL NOT NULL DEFAULT 0,
                home_ownership_rate_param REAL NOT NULL DEFAULT 0,
                median_home_value_param REAL NOT NULL DEFAULT 0,
                median_rent_param REAL NOT NULL DEFAULT 0,
                share_of_college_education_param REAL NOT NULL DEFAULT 0,
                avg_commute_time_param REAL NOT NULL DEFAULT 0,
                intercept REAL NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Update regression coefficients for one target component.
    ///
    /// Every column name in `updates` must come from
    /// [`crate::constants::regression::column_for`]. Returns whether the
    /// target component row existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_regression_parameters(
        &self,
        target_component: &str,
        updates: &[(&'static str, f64)],
    ) -> AppResult<bool> {
        if updates.is_empty() {
            return Ok(false);
        }

        let assignments = updates
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let statement =
            format!("UPDATE regression_parameters SET {assignments} WHERE target_component = ?");

        let mut query = sqlx::query(&statement);
        for (_, value) in updates {
            query = query.bind(value);
        }
        query = query.bind(target_component);

        let result = query.execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Seed a coefficient row for a target component (setup and tests)
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_regression_target(&self, target_component: &str) -> AppResult<()> {
        sqlx::query("INSERT OR IGNORE INTO regression_parameters (target_component) VALUES (?)")
            .bind(target_component)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
