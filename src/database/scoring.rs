// ABOUTME: Invokes the database-resident scoring procedures
// ABOUTME: The scoring math itself lives in the database, not this service
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! The happiness index is recomputed by stored procedures owned by the data
//! team; this service only triggers them. The procedures exist on the shared
//! production database, so these calls fail on a plain SQLite file and are
//! surfaced as database errors to the admin console.

use tracing::info;

use super::Database;
use crate::errors::AppResult;

impl Database {
    /// Recompute every component score from the current regression parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the backing database does not provide the
    /// procedure or the procedure itself fails
    pub async fn recalculate_happiness_index(&self) -> AppResult<()> {
        sqlx::query("CALL RecalculateHappinessIndex()")
            .execute(self.pool())
            .await?;
        info!("Happiness index recalculation triggered");
        Ok(())
    }

    /// Drop statistical outliers from the survey data feeding the model
    ///
    /// # Errors
    ///
    /// Returns an error if the backing database does not provide the
    /// procedure or the procedure itself fails
    pub async fn filter_outliers(&self) -> AppResult<()> {
        sqlx::query("CALL FilterOutliers()")
            .execute(self.pool())
            .await?;
        info!("Survey outlier filtering triggered");
        Ok(())
    }
}
