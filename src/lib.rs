// CodeTrack
// Data normalization core for a cross-platform coding practice
// dashboard: stats aggregation, answer grading and resilient fetch

pub mod api;
pub mod features;
pub mod models;
pub mod utils;

pub use api::client::{cancel_pair, FetchError, RequestDescriptor, ResilientClient};
pub use api::contests::ContestService;
pub use api::practice::PracticeService;
pub use api::profiles::ProfileService;
pub use features::grading::{grade, resolve_correct_answer, Verdict};
pub use features::overview::{aggregate, AggregatedOverview};
pub use models::platform::Platform;
pub use models::stats::ProfileBundle;
