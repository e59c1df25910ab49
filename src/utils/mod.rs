// Utility functions module
pub mod coerce;
pub mod config;
