//! Shared constants for FlexiBot crates.

pub mod app;
pub mod models;
pub mod settings;
