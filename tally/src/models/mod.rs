pub mod achievement;
pub mod meeting;
pub mod naming;
pub mod period;
pub mod snapshot;
pub mod target;
pub mod user;

pub use achievement::{MetricReview, Tier};
pub use meeting::MeetingLog;
pub use period::{DateSpan, Period, PeriodUnit};
pub use snapshot::{ActualSnapshot, RetargetingAlert};
pub use target::{MonthlyTargets, TargetFields, TargetRecord, WeeklyTargets};
pub use user::User;
