//! Station API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::response::{ApiResponse, ApiResult, Pagination};
use super::train::ListQuery;
use super::validation::{Validate, ValidatedJson, finish, require_positive, require_text};
use crate::domain::{CreateStationInput, PageRequest, Station, UpdateStationInput};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::AdminClaims;
use crate::services::station_service;

const NAME_MAX: usize = 50;
const LOCATION_MAX: usize = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStationRequest {
    #[serde(alias = "stationName")]
    pub station_name: String,
    #[serde(alias = "stationLocation")]
    pub station_location: String,
    #[serde(alias = "totalPlatform")]
    pub total_platform: i32,
}

impl Validate for CreateStationRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require_text(&mut errors, "station_name", &self.station_name, NAME_MAX);
        require_text(&mut errors, "station_location", &self.station_location, LOCATION_MAX);
        require_positive(&mut errors, "total_platform", self.total_platform);
        finish(errors)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateStationRequest {
    #[serde(default, alias = "stationName")]
    pub station_name: Option<String>,
    #[serde(default, alias = "stationLocation")]
    pub station_location: Option<String>,
    #[serde(default, alias = "totalPlatform")]
    pub total_platform: Option<i32>,
}

impl Validate for UpdateStationRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if let Some(name) = &self.station_name {
            require_text(&mut errors, "station_name", name, NAME_MAX);
        }
        if let Some(location) = &self.station_location {
            require_text(&mut errors, "station_location", location, LOCATION_MAX);
        }
        if let Some(platforms) = self.total_platform {
            require_positive(&mut errors, "total_platform", platforms);
        }
        finish(errors)
    }
}

/// Body of `/station/list/needAllData`
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchRequest {
    #[serde(default)]
    pub search: Option<String>,
}

pub async fn create_station(
    _admin: AdminClaims,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateStationRequest>,
) -> ApiResult<Station> {
    let input = CreateStationInput {
        station_name: payload.station_name.trim().to_string(),
        station_location: payload.station_location.trim().to_string(),
        total_platform: Some(payload.total_platform),
    };

    let station = station_service::create_station(state.station_repo.as_ref(), input).await?;
    Ok(ApiResponse::created(station, "Station created successfully"))
}

pub async fn list_stations(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Station>> {
    let page = PageRequest::from(query);
    let result = station_service::list_stations(state.station_repo.as_ref(), &page).await?;

    Ok(
        ApiResponse::ok(result.items, "Stations retrieved successfully")
            .with_pagination(Pagination::new(&page, result.total)),
    )
}

/// Unpaginated station list; an absent or unparsable body means no filter.
#[utoipa::path(
    post,
    path = "/api/station/list/needAllData",
    request_body = SearchRequest,
    responses((status = 200, description = "All matching stations"))
)]
pub async fn list_all_stations(
    State(state): State<AppState>,
    payload: Option<Json<SearchRequest>>,
) -> ApiResult<Vec<Station>> {
    let search = payload
        .and_then(|Json(body)| body.search)
        .unwrap_or_default();

    let stations = station_service::list_all_stations(state.station_repo.as_ref(), &search).await?;
    Ok(ApiResponse::ok(stations, "Stations retrieved successfully"))
}

pub async fn get_station(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> ApiResult<Station> {
    let station = station_service::get_station(state.station_repo.as_ref(), &station_id).await?;
    Ok(ApiResponse::ok(station, "Station retrieved successfully"))
}

pub async fn update_station(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateStationRequest>,
) -> ApiResult<Station> {
    let input = UpdateStationInput {
        station_name: payload.station_name.map(|n| n.trim().to_string()),
        station_location: payload.station_location.map(|l| l.trim().to_string()),
        total_platform: payload.total_platform,
    };

    let station =
        station_service::update_station(state.station_repo.as_ref(), &station_id, input).await?;
    Ok(ApiResponse::ok(station, "Station updated successfully"))
}

pub async fn delete_station(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> ApiResult<Option<()>> {
    station_service::delete_station(state.station_repo.as_ref(), &station_id).await?;
    Ok(ApiResponse::ok(None, "Station deleted successfully"))
}
