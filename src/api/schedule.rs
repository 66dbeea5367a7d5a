//! Train schedule API handlers
//!
//! Create bodies are camelCase (snake_case accepted); update bodies are
//! snake_case (camelCase accepted). In an update, an explicit `null` for
//! `arrival_time`/`departure_time` clears the time; an absent field leaves
//! it unchanged.

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use utoipa::ToSchema;

use super::response::{ApiResponse, ApiResult, Pagination};
use super::train::ListQuery;
use super::validation::{Validate, ValidatedJson, double_option, finish, require_positive};
use crate::domain::{NewStop, PageRequest, Stop, StopPatch};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::AdminClaims;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    #[serde(alias = "train_id")]
    pub train_id: String,
    #[serde(alias = "station_id")]
    pub station_id: String,
    /// Copied from the station when omitted
    #[serde(default, alias = "station_name")]
    pub station_name: Option<String>,
    #[serde(alias = "stop_number")]
    pub stop_number: i32,
    #[serde(alias = "platform_number")]
    pub platform_number: i32,
    /// `HH:MM` or `HH:MM:SS`
    #[serde(alias = "arrival_time")]
    pub arrival_time: String,
    #[serde(alias = "departure_time")]
    pub departure_time: String,
    #[serde(default, alias = "day_offset")]
    pub day_offset: i32,
    #[serde(default, alias = "is_start")]
    pub is_start: bool,
    #[serde(default, alias = "is_end")]
    pub is_end: bool,
}

impl Validate for CreateScheduleRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.train_id.trim().is_empty() {
            errors.push("trainId should not be empty".to_string());
        }
        if self.station_id.trim().is_empty() {
            errors.push("stationId should not be empty".to_string());
        }
        require_positive(&mut errors, "stopNumber", self.stop_number);
        require_positive(&mut errors, "platformNumber", self.platform_number);
        if self.day_offset < 0 {
            errors.push("dayOffset must not be negative".to_string());
        }
        finish(errors)
    }
}

impl From<CreateScheduleRequest> for NewStop {
    fn from(req: CreateScheduleRequest) -> Self {
        NewStop {
            train_id: req.train_id,
            station_id: req.station_id,
            station_name: req.station_name.unwrap_or_default(),
            stop_number: req.stop_number,
            platform_number: req.platform_number,
            arrival_time: req.arrival_time,
            departure_time: req.departure_time,
            day_offset: req.day_offset,
            is_start: req.is_start,
            is_end: req.is_end,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateScheduleRequest {
    #[serde(default, alias = "trainId")]
    pub train_id: Option<String>,
    #[serde(default, alias = "stationId")]
    pub station_id: Option<String>,
    #[serde(default, alias = "stationName")]
    pub station_name: Option<String>,
    #[serde(default, alias = "stopNumber")]
    pub stop_number: Option<i32>,
    #[serde(default, alias = "platformNumber")]
    pub platform_number: Option<i32>,
    #[serde(default, alias = "arrivalTime", deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub arrival_time: Option<Option<String>>,
    #[serde(default, alias = "departureTime", deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub departure_time: Option<Option<String>>,
    #[serde(default, alias = "dayOffset")]
    pub day_offset: Option<i32>,
    #[serde(default, alias = "isStart")]
    pub is_start: Option<bool>,
    #[serde(default, alias = "isEnd")]
    pub is_end: Option<bool>,
}

impl Validate for UpdateScheduleRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        for (field, value) in [
            ("train_id", &self.train_id),
            ("station_id", &self.station_id),
            ("station_name", &self.station_name),
        ] {
            if let Some(v) = value
                && v.trim().is_empty()
            {
                errors.push(format!("{} should not be empty", field));
            }
        }
        if let Some(n) = self.stop_number {
            require_positive(&mut errors, "stop_number", n);
        }
        if let Some(n) = self.platform_number {
            require_positive(&mut errors, "platform_number", n);
        }
        if let Some(d) = self.day_offset
            && d < 0
        {
            errors.push("day_offset must not be negative".to_string());
        }
        finish(errors)
    }
}

impl From<UpdateScheduleRequest> for StopPatch {
    fn from(req: UpdateScheduleRequest) -> Self {
        StopPatch {
            train_id: req.train_id,
            station_id: req.station_id,
            station_name: req.station_name,
            stop_number: req.stop_number,
            platform_number: req.platform_number,
            arrival_time: req.arrival_time,
            departure_time: req.departure_time,
            day_offset: req.day_offset,
            is_start: req.is_start,
            is_end: req.is_end,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/schedule",
    request_body = CreateScheduleRequest,
    responses(
        (status = 201, description = "Stop created"),
        (status = 400, description = "Rejected by the schedule rules"),
        (status = 404, description = "Train or station not found")
    )
)]
pub async fn create_schedule(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateScheduleRequest>,
) -> ApiResult<Stop> {
    let stop = state.schedules.create(NewStop::from(payload)).await?;
    Ok(ApiResponse::created(stop, "Train schedule created successfully"))
}

pub async fn list_schedules(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Stop>> {
    let page = PageRequest::from(query);
    let result = state.schedules.list(&page).await?;

    Ok(
        ApiResponse::ok(result.items, "Train schedules retrieved successfully")
            .with_pagination(Pagination::new(&page, result.total)),
    )
}

pub async fn get_schedule(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Stop> {
    let stop = state.schedules.find_by_id(&id).await?;
    Ok(ApiResponse::ok(stop, "Train schedule retrieved successfully"))
}

#[utoipa::path(
    put,
    path = "/api/schedule/{id}",
    params(("id" = String, Path, description = "Schedule id")),
    request_body = UpdateScheduleRequest,
    responses(
        (status = 200, description = "Stop updated"),
        (status = 400, description = "Rejected by the schedule rules"),
        (status = 404, description = "Schedule not found")
    )
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateScheduleRequest>,
) -> ApiResult<Stop> {
    let stop = state.schedules.update(&id, StopPatch::from(payload)).await?;
    Ok(ApiResponse::ok(stop, "Train schedule updated successfully"))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Option<()>> {
    state.schedules.delete(&id).await?;
    Ok(ApiResponse::ok(None, "Train schedule deleted successfully"))
}

pub async fn schedules_by_train(
    State(state): State<AppState>,
    Path(train_id): Path<String>,
) -> ApiResult<Vec<Stop>> {
    let stops = state.schedules.find_by_train(&train_id).await?;
    Ok(ApiResponse::ok(stops, "Train schedules retrieved successfully"))
}

pub async fn schedules_by_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> ApiResult<Vec<Stop>> {
    let stops = state.schedules.find_by_station(&station_id).await?;
    Ok(ApiResponse::ok(stops, "Train schedules retrieved successfully"))
}
