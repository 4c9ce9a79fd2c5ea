//! v1 request handlers.

pub mod health;
pub mod logs;
pub mod review;
pub mod stats;
pub mod targets;
