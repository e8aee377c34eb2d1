//! Data layer module
//!
//! Handles all data persistence:
//! - SQLite database operations
//! - Account models

mod database;
mod models;

pub use database::Database;
pub use models::*;

#[cfg(test)]
mod database_test;
