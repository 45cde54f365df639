//! Custom Axum extractors.

pub mod official_auth;

pub use official_auth::OfficialAuth;
