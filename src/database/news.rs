// ABOUTME: Scraped local news article lookups by ZIP code and city
// ABOUTME: City lookups include the ZIP code so the client can group articles
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use sqlx::Row;

use super::Database;
use crate::errors::AppResult;
use crate::models::NewsArticle;

impl Database {
    pub(super) async fn migrate_news(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS news_articles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                zipcode TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                url TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_news_zipcode ON news_articles (zipcode)")
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// List articles for a single ZIP code
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn news_for_zipcode(&self, zipcode: &str) -> AppResult<Vec<NewsArticle>> {
        let rows = sqlx::query(
            "SELECT title, description, url FROM news_articles WHERE zipcode = ?",
        )
        .bind(zipcode)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(NewsArticle {
                    title: row.try_get("title")?,
                    description: row.try_get("description")?,
                    url: row.try_get("url")?,
                    zipcode: None,
                })
            })
            .collect()
    }

    /// List articles across several ZIP codes, tagged with their ZIP code
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn news_for_zipcodes(&self, zipcodes: &[String]) -> AppResult<Vec<NewsArticle>> {
        if zipcodes.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; zipcodes.len()].join(", ");
        let statement = format!(
            "SELECT zipcode, title, description, url FROM news_articles \
             WHERE zipcode IN ({placeholders})"
        );

        let mut query = sqlx::query(&statement);
        for zipcode in zipcodes {
            query = query.bind(zipcode);
        }

        let rows = query.fetch_all(self.pool()).await?;
        rows.into_iter()
            .map(|row| {
                Ok(NewsArticle {
                    title: row.try_get("title")?,
                    description: row.try_get("description")?,
                    url: row.try_get("url")?,
                    zipcode: Some(row.try_get("zipcode")?),
                })
            })
            .collect()
    }

    /// Insert one article (scraper import and tests)
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_news_article(
        &self,
        zipcode: &str,
        title: &str,
        description: Option<&str>,
        url: &str,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO news_articles (zipcode, title, description, url) VALUES (?, ?, ?, ?)",
        )
        .bind(zipcode)
        .bind(title)
        .bind(description)
        .bind(url)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
