// ABOUTME: Core data models for the happiness index API
// ABOUTME: Defines User, ComponentScores, survey, crime, and news row types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Data Models
//!
//! Relational row types used throughout the service. Every entity here is a
//! database row shaped for one request/response cycle; there is no in-process
//! lifecycle beyond that.
//!
//! Response types serialize with camelCase field names to match the map
//! client's expectations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::limits;

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,
    /// Email address, unique across accounts
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Bcrypt password hash
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Optional home ZIP code
    pub home_zipcode: Option<String>,
    /// Whether the user may view community comments and crime data
    pub review_access: bool,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh ID and creation timestamp
    #[must_use]
    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            first_name,
            last_name,
            password_hash,
            home_zipcode: None,
            review_access: false,
            created_at: Utc::now(),
        }
    }
}

/// Precomputed component happiness scores for one ZIP code.
///
/// Computed by the `RecalculateHappinessIndex` stored procedure; this service
/// only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScores {
    pub total_happiness_score: f64,
    pub economic_wellbeing_score: f64,
    pub family_and_relationships_score: f64,
    pub physical_and_mental_wellbeing_score: f64,
    pub environmental_and_societal_wellness_score: f64,
}

/// A user-submitted happiness survey, ready for insertion
#[derive(Debug, Clone)]
pub struct NewSurvey {
    /// Submitting user's email (taken from the verified token)
    pub user_email: String,
    /// ZIP code the rating applies to
    pub zipcode: String,
    /// Self-reported happiness rating, 1..=10
    pub rating: i64,
    /// Optional free-text comment
    pub comment: Option<String>,
}

impl NewSurvey {
    /// Check that the rating is within the accepted range
    #[must_use]
    pub fn rating_in_range(&self) -> bool {
        (limits::MIN_SURVEY_RATING..=limits::MAX_SURVEY_RATING).contains(&self.rating)
    }
}

/// A survey comment returned to users with review access
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyComment {
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregated crime count for one event type within the look-back window
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CrimeStat {
    pub event_type: String,
    pub event_count: i64,
}

/// A scraped news article associated with a ZIP code
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    /// Included only for city-wide lookups spanning several ZIP codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
}

/// Validate a ZIP code parameter: exactly five ASCII digits
#[must_use]
pub fn is_valid_zipcode(zipcode: &str) -> bool {
    zipcode.len() == limits::ZIPCODE_LENGTH && zipcode.bytes().all(|b| b.is_ascii_digit())
}
