// API services module
pub mod client;
pub mod contests;
pub mod practice;
pub mod profiles;
