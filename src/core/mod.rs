//! Configuration, domain models, and the language table.

pub mod config;
pub mod languages;
pub mod models;
