// ABOUTME: System-wide constants and whitelists for the happiness index API
// ABOUTME: Holds limits, error message strings, and SQL column name mappings
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Constants Module
//!
//! Application constants, attribute whitelists, and error message strings.
//! The whitelists are the only place a column name may enter a SQL statement;
//! everything else goes through parameter binds.

/// Service identity
pub mod service_names {
    /// Canonical service name used for logging and the JWT audience claim
    pub const HAPPY_MAP: &str = "happy-map-server";
}

/// Numeric limits and expiry windows
pub mod limits {
    /// Default user session token lifetime in hours
    pub const USER_TOKEN_EXPIRY_HOURS: i64 = 1;

    /// Default admin console token lifetime in hours
    pub const ADMIN_TOKEN_EXPIRY_HOURS: i64 = 1;

    /// Minimum password length accepted at signup
    pub const MIN_PASSWORD_LENGTH: usize = 8;

    /// Survey rating bounds (inclusive)
    pub const MIN_SURVEY_RATING: i64 = 1;
    /// Survey rating upper bound (inclusive)
    pub const MAX_SURVEY_RATING: i64 = 10;

    /// Crime statistics look-back window in days
    pub const CRIME_WINDOW_DAYS: i64 = 90;

    /// Minimum per-type event count included in crime statistics
    pub const CRIME_MIN_EVENT_COUNT: i64 = 10;

    /// Admin login attempts allowed per window
    pub const ADMIN_LOGIN_MAX_ATTEMPTS: u32 = 5;

    /// Admin login rate limit window in seconds (15 minutes)
    pub const ADMIN_LOGIN_WINDOW_SECS: u64 = 900;

    /// ZIP codes are exactly five ASCII digits
    pub const ZIPCODE_LENGTH: usize = 5;
}

/// Shared error message strings
pub mod error_messages {
    /// Returned when signup email fails format validation
    pub const INVALID_EMAIL_FORMAT: &str = "Invalid email format";
    /// Returned when signup password fails strength validation
    pub const PASSWORD_TOO_WEAK: &str = "Password must be at least 8 characters";
    /// Returned when signup email is already registered
    pub const EMAIL_ALREADY_REGISTERED: &str = "Email is already registered";
    /// Returned on bad signin credentials (never reveals which part failed)
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
    /// Returned when a gated endpoint is hit without the review-access flag
    pub const NO_REVIEW_ACCESS: &str = "User has no access to see community data";
    /// Returned when a ZIP code parameter fails format validation
    pub const INVALID_ZIPCODE: &str = "Invalid ZIP code format";
}

/// Whitelisted ZIP-area demographic attributes the admin console may update.
///
/// The API-facing attribute identifiers are camelCase (matching the survey
/// data pipeline); `column_for` maps each one to its SQL column.
pub mod zip_attributes {
    /// All attribute identifiers accepted by the update-field operation
    pub const ALLOWED: [&str; 12] = [
        "population",
        "populationDensity",
        "medianAge",
        "shareOfMarried",
        "avgFamilySize",
        "unemploymentRate",
        "householdMedianIncome",
        "homeOwnershipRate",
        "medianHomeValue",
        "medianRent",
        "shareOfCollegeEducation",
        "avgCommuteTime",
    ];

    /// Map an attribute identifier to its SQL column name
    #[must_use]
    pub fn column_for(attribute: &str) -> Option<&'static str> {
        match attribute {
            "population" => Some("population"),
            "populationDensity" => Some("population_density"),
            "medianAge" => Some("median_age"),
            "shareOfMarried" => Some("share_of_married"),
            "avgFamilySize" => Some("avg_family_size"),
            "unemploymentRate" => Some("unemployment_rate"),
            "householdMedianIncome" => Some("household_median_income"),
            "homeOwnershipRate" => Some("home_ownership_rate"),
            "medianHomeValue" => Some("median_home_value"),
            "medianRent" => Some("median_rent"),
            "shareOfCollegeEducation" => Some("share_of_college_education"),
            "avgCommuteTime" => Some("avg_commute_time"),
            _ => None,
        }
    }
}

/// Whitelisted regression targets and coefficient names for parameter tuning
pub mod regression {
    /// Component score names a coefficient set may target
    pub const TARGET_COMPONENTS: [&str; 5] = [
        "economicWellbeingScore",
        "environmentalAndSocietalWellnessScore",
        "physicalAndMentalWellbeingScore",
        "familyAndRelationshipsScore",
        "totalHappinessScore",
    ];

    /// All coefficient identifiers accepted by the update-parameters operation
    pub const PARAMETERS: [&str; 13] = [
        "populationParam",
        "populationDensityParam",
        "medianAgeParam",
        "shareOfMarriedParam",
        "avgFamilySizeParam",
        "unemploymentRateParam",
        "householdMedianIncomeParam",
        "homeOwnershipRateParam",
        "medianHomeValueParam",
        "medianRentParam",
        "shareOfCollegeEducationParam",
        "avgCommuteTimeParam",
        "intercept",
    ];

    /// Check that a target component name is whitelisted
    #[must_use]
    pub fn is_valid_target(target: &str) -> bool {
        TARGET_COMPONENTS.contains(&target)
    }

    /// Map a coefficient identifier to its SQL column name
    #[must_use]
    pub fn column_for(parameter: &str) -> Option<&'static str> {
        match parameter {
            "populationParam" => Some("population_param"),
            "populationDensityParam" => Some("population_density_param"),
            "medianAgeParam" => Some("median_age_param"),
            "shareOfMarriedParam" => Some("share_of_married_param"),
            "avgFamilySizeParam" => Some("avg_family_size_param"),
            "unemploymentRateParam" => Some("unemployment_rate_param"),
            "householdMedianIncomeParam" => Some("household_median_income_param"),
            "homeOwnershipRateParam" => Some("home_ownership_rate_param"),
            "medianHomeValueParam" => Some("median_home_value_param"),
            "medianRentParam" => Some("median_rent_param"),
            "shareOfCollegeEducationParam" => Some("share_of_college_education_param"),
            "avgCommuteTimeParam" => Some("avg_commute_time_param"),
            "intercept" => Some("intercept"),
            _ => None,
        }
    }
}
