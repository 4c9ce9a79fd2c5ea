//! Request and query types for the v1 API.

pub mod logs;
pub mod review;
pub mod stats;
pub mod targets;

pub use logs::{ListLogsQuery, SaveLogRequest};
pub use review::ReviewQuery;
pub use stats::{PerformanceQuery, TrackingStats, WeeklySumQuery};
pub use targets::{BulkApplyRequest, PeriodQuery, UpsertTargetRequest};
