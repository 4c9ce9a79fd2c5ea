pub mod aggregator;
pub mod authorizer;
pub mod performance;
pub mod review;
pub mod rollup;
pub mod targets;

pub use aggregator::ActualsAggregator;
pub use performance::{ManagerPerformance, PerformanceService, PerformanceStats, PerformanceSummary};
pub use review::{MeetingReview, MonthlyReview, ReviewEntry, ReviewMetrics, ReviewService, WeeklyReview};
pub use rollup::{MonthlyRollup, RollupService, UserRollup, WeekSlice};
pub use targets::TargetsService;
