//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{
    ScheduleConsistencyEngine, ScheduleRepository, StationRepository, TimeComparison,
    TrainRepository,
};
use crate::infrastructure::locks::TrainLocks;
use crate::infrastructure::{
    SeaOrmScheduleRepository, SeaOrmStationRepository, SeaOrmTrainRepository,
};
use crate::services::ScheduleService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub train_repo: Arc<dyn TrainRepository>,
    pub station_repo: Arc<dyn StationRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    /// Per-train write locks, shared with the schedule service
    pub train_locks: Arc<TrainLocks>,
    pub schedules: Arc<ScheduleService>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, time_comparison: TimeComparison) -> Self {
        let train_repo: Arc<dyn TrainRepository> =
            Arc::new(SeaOrmTrainRepository::new(db.clone()));
        let station_repo: Arc<dyn StationRepository> =
            Arc::new(SeaOrmStationRepository::new(db.clone()));
        let schedule_repo: Arc<dyn ScheduleRepository> =
            Arc::new(SeaOrmScheduleRepository::new(db.clone()));
        let train_locks = Arc::new(TrainLocks::new());

        let schedules = Arc::new(ScheduleService::new(
            ScheduleConsistencyEngine::new(time_comparison),
            train_repo.clone(),
            station_repo.clone(),
            schedule_repo.clone(),
            train_locks.clone(),
        ));

        Self {
            db,
            train_repo,
            station_repo,
            schedule_repo,
            train_locks,
            schedules,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
