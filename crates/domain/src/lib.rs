//! Domain layer for the office monitor backend.
//!
//! This crate contains:
//! - Domain models (OfficeAccount, ApplicationRecord, stats reports, roster config)
//! - Business logic services (metric calculation, hierarchy resolution, aggregation)
//! - Store traits implemented by the persistence layer

pub mod models;
pub mod services;
