//! Train API handlers (admin only)

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::response::{ApiResponse, ApiResult, Pagination};
use super::validation::{Validate, ValidatedJson, finish, require_positive, require_text};
use crate::domain::{CreateTrainInput, PageRequest, Train, UpdateTrainInput};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::AdminClaims;
use crate::services::train_service;

const NAME_MAX: usize = 50;

/// `?page&limit&search` for the list endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

impl From<ListQuery> for PageRequest {
    fn from(q: ListQuery) -> Self {
        PageRequest::new(q.page, q.limit, q.search)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTrainRequest {
    #[serde(alias = "trainName")]
    pub train_name: String,
    #[serde(alias = "totalSeats")]
    pub total_seats: i32,
    #[serde(alias = "seatsPerCoach")]
    pub seats_per_coach: i32,
}

impl Validate for CreateTrainRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require_text(&mut errors, "train_name", &self.train_name, NAME_MAX);
        require_positive(&mut errors, "total_seats", self.total_seats);
        require_positive(&mut errors, "seats_per_coach", self.seats_per_coach);
        finish(errors)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTrainRequest {
    #[serde(default, alias = "trainName")]
    pub train_name: Option<String>,
    #[serde(default, alias = "totalSeats")]
    pub total_seats: Option<i32>,
    #[serde(default, alias = "seatsPerCoach")]
    pub seats_per_coach: Option<i32>,
}

impl Validate for UpdateTrainRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if let Some(name) = &self.train_name {
            require_text(&mut errors, "train_name", name, NAME_MAX);
        }
        if let Some(seats) = self.total_seats {
            require_positive(&mut errors, "total_seats", seats);
        }
        if let Some(seats) = self.seats_per_coach {
            require_positive(&mut errors, "seats_per_coach", seats);
        }
        finish(errors)
    }
}

#[utoipa::path(
    post,
    path = "/api/train",
    request_body = CreateTrainRequest,
    responses(
        (status = 201, description = "Train created"),
        (status = 409, description = "Train name already exists")
    ),
    security(("bearer" = []))
)]
pub async fn create_train(
    _admin: AdminClaims,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTrainRequest>,
) -> ApiResult<Train> {
    let input = CreateTrainInput {
        train_name: payload.train_name.trim().to_string(),
        total_seats: Some(payload.total_seats),
        seats_per_coach: Some(payload.seats_per_coach),
    };

    let train = train_service::create_train(state.train_repo.as_ref(), input).await?;
    Ok(ApiResponse::created(train, "Train created successfully"))
}

#[utoipa::path(
    post,
    path = "/api/train/list",
    params(ListQuery),
    responses((status = 200, description = "Paginated trains")),
    security(("bearer" = []))
)]
pub async fn list_trains(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Train>> {
    let page = PageRequest::from(query);
    let result = train_service::list_trains(state.train_repo.as_ref(), &page).await?;

    Ok(
        ApiResponse::ok(result.items, "Trains retrieved successfully")
            .with_pagination(Pagination::new(&page, result.total)),
    )
}

pub async fn get_train(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Train> {
    let train = train_service::get_train(state.train_repo.as_ref(), &id).await?;
    Ok(ApiResponse::ok(train, "Train retrieved successfully"))
}

pub async fn update_train(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateTrainRequest>,
) -> ApiResult<Train> {
    let input = UpdateTrainInput {
        train_name: payload.train_name.map(|n| n.trim().to_string()),
        total_seats: payload.total_seats,
        seats_per_coach: payload.seats_per_coach,
    };

    let train = train_service::update_train(state.train_repo.as_ref(), &id, input).await?;
    Ok(ApiResponse::ok(train, "Train updated successfully"))
}

pub async fn delete_train(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Option<()>> {
    train_service::delete_train(state.train_repo.as_ref(), &state.train_locks, &id).await?;
    Ok(ApiResponse::ok(None, "Train deleted successfully"))
}
