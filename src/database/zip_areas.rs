// ABOUTME: ZIP area demographic data and admin attribute updates
// ABOUTME: Column names come only from the compile-time attribute whitelist
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use sqlx::Row;

use super::Database;
use crate::errors::AppResult;

impl Database {
    pub(super) async fn migrate_zip_areas(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS zip_areas (
                zipcode TEXT PRIMARY KEY,
                city TEXT NOT NULL,
                state TEXT NOT NULL,
                population REAL,
                population_density REAL,
                median_age REAL,
                share_of_married REAL,
                avg_family_size REAL,
                unemployment_rate REAL,
                household_median_income REAL,
                home_ownership_rate REAL,
                median_home_value REAL,
                median_rent REAL,
                share_of_college_education REAL,
                avg_commute_time REAL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_zip_areas_city ON zip_areas (city)")
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Update a single demographic attribute for a ZIP area.
    ///
    /// `column` must come from [`crate::constants::zip_attributes::column_for`];
    /// this is the only way a column name reaches this statement. Returns
    /// whether the ZIP code existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_zip_attribute(
        &self,
        zipcode: &str,
        column: &'static str,
        value: f64,
    ) -> AppResult<bool> {
        let statement = format!("UPDATE zip_areas SET {column} = ? WHERE zipcode = ?");
        let result = sqlx::query(&statement)
            .bind(value)
            .bind(zipcode)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the ZIP codes belonging to a city
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn zipcodes_for_city(&self, city: &str) -> AppResult<Vec<String>> {
        let rows = sqlx::query("SELECT zipcode FROM zip_areas WHERE city = ?")
            .bind(city)
            .fetch_all(self.pool())
            .await?;

        rows.into_iter()
            .map(|row| Ok(row.try_get("zipcode")?))
            .collect()
    }

    /// Insert a ZIP area row (data loading and tests)
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_zip_area(&self, zipcode: &str, city: &str, state: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO zip_areas (zipcode, city, state) VALUES (?, ?, ?)")
            .bind(zipcode)
            .bind(city)
            .bind(state)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
