//! Shared utilities for the office monitor backend.
//!
//! This crate provides functionality used across the other crates:
//! - Bearer token (JWT) issuance and verification

pub mod jwt;
