//! Command handlers.

pub mod caption;
pub mod config;
