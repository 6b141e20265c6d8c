// ABOUTME: HTTP route modules grouped by domain
// ABOUTME: Each module exposes a Routes struct building its own Router
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Routes Module
//!
//! One module per API surface. Every module follows the same shape: a unit
//! struct with a `routes` constructor and associated handler functions taking
//! the shared resources through `State`.

pub mod admin;
pub mod api;
pub mod auth;
pub mod community;
pub mod health;
pub mod news;
pub mod scores;
pub mod surveys;
