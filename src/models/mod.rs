// Data models module
pub mod contest;
pub mod platform;
pub mod question;
pub mod stats;
