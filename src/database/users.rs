// ABOUTME: User account database operations
// ABOUTME: Creation, lookup by email, and account deletion
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;

impl Database {
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                home_zipcode TEXT,
                review_access INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Insert a new user account.
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the email is already registered
    pub async fn create_user(&self, user: &User) -> AppResult<()> {
        let result = sqlx::query(
            r"
            INSERT INTO users (id, email, first_name, last_name, password_hash,
                               home_zipcode, review_access, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(&user.home_zipcode)
        .bind(user.review_access)
        .bind(user.created_at)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                AppError::conflict(crate::constants::error_messages::EMAIL_ALREADY_REGISTERED),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is corrupt
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, email, first_name, last_name, password_hash,
                   home_zipcode, review_access, created_at
            FROM users WHERE email = ?
            ",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        row.map(|row| {
            let id: String = row.try_get("id")?;
            Ok(User {
                id: Uuid::parse_str(&id)
                    .map_err(|e| AppError::database(format!("Corrupt user ID: {e}")))?,
                email: row.try_get("email")?,
                first_name: row.try_get("first_name")?,
                last_name: row.try_get("last_name")?,
                password_hash: row.try_get("password_hash")?,
                home_zipcode: row.try_get("home_zipcode")?,
                review_access: row.try_get("review_access")?,
                created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            })
        })
        .transpose()
    }

    /// Delete a user account by email, returning whether a row was removed
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete_user_by_email(&self, email: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE email = ?")
            .bind(email)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip the review-access flag for an account (test and ops tooling)
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn set_review_access(&self, email: &str, review_access: bool) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET review_access = ? WHERE email = ?")
            .bind(review_access)
            .bind(email)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
