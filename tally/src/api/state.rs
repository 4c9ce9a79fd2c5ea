use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::services::{
    ActualsAggregator, PerformanceService, ReviewService, RollupService, TargetsService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub targets: TargetsService,
    pub review: ReviewService,
    pub rollup: RollupService,
    pub performance: PerformanceService,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Self {
        let config = Arc::new(config);
        let aggregator = ActualsAggregator::new(db.clone());
        let targets = TargetsService::new(db.clone());
        let review = ReviewService::new(db.clone(), aggregator);
        let rollup = RollupService::new(db.clone());
        let performance = PerformanceService::new(db.clone());

        Self {
            config,
            db,
            targets,
            review,
            rollup,
            performance,
        }
    }
}
