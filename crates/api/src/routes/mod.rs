//! HTTP route handlers.

pub mod health;
pub mod monitor;
pub mod office;
pub mod officials;
