pub mod health;
pub mod response;
pub mod schedule;
pub mod station;
pub mod train;
pub mod validation;

use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Trains (admin)
        .route("/train", post(train::create_train))
        .route("/train/list", post(train::list_trains))
        .route(
            "/train/:id",
            get(train::get_train)
                .put(train::update_train)
                .delete(train::delete_train),
        )
        // Stations
        .route("/station", post(station::create_station))
        .route("/station/list", post(station::list_stations))
        .route(
            "/station/list/needAllData",
            post(station::list_all_stations),
        )
        .route(
            "/station/:station_id",
            get(station::get_station)
                .put(station::update_station)
                .delete(station::delete_station),
        )
        // Train schedules
        .route("/schedule", post(schedule::create_schedule))
        .route("/schedule/list", post(schedule::list_schedules))
        .route(
            "/schedule/:id",
            get(schedule::get_schedule)
                .put(schedule::update_schedule)
                .delete(schedule::delete_schedule),
        )
        .route(
            "/schedule/train/:train_id",
            get(schedule::schedules_by_train),
        )
        .route(
            "/schedule/station/:station_id",
            get(schedule::schedules_by_station),
        )
        .with_state(state)
}
