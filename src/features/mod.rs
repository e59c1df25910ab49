// Feature logic module
pub mod grading;
pub mod overview;
