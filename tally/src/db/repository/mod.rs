pub mod activities;
pub mod contact_history;
pub mod meeting_logs;
pub mod retargeting;
pub mod sales;
pub mod targets;
pub mod users;

pub use activities::{ActivitiesRepository, ManagerActivity};
pub use contact_history::ContactHistoryRepository;
pub use meeting_logs::MeetingLogsRepository;
pub use retargeting::RetargetingRepository;
pub use sales::{SalesRepository, SalesTotals};
pub use targets::TargetsRepository;
pub use users::UsersRepository;
