//! Response envelope shared by every endpoint.
//!
//! ```json
//! {
//!   "responseStatusList": {"statusList": [{"statusCode": 200, "statusType": "success", "statusDesc": "..."}]},
//!   "responseObject": {"data": ..., "pagination": ..., "error": ...}
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{DomainError, PageRequest, ScheduleRejection};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub status_code: u16,
    /// `success` or `error`
    pub status_type: String,
    pub status_desc: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusList {
    pub status_list: Vec<Status>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl Pagination {
    pub fn new(page: &PageRequest, total_items: u64) -> Self {
        Self {
            current_page: page.page,
            limit: page.limit,
            total_pages: total_items.div_ceil(page.limit),
            total_items,
        }
    }
}

/// Error payload: stable code plus message
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseObject<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub response_status_list: StatusList,
    pub response_object: ResponseObject<T>,
}

fn status_list(status: StatusCode, status_type: &str, desc: String) -> StatusList {
    StatusList {
        status_list: vec![Status {
            status_code: status.as_u16(),
            status_type: status_type.to_string(),
            status_desc: desc,
        }],
    }
}

/// Successful response carrying `data`
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    message: String,
    data: T,
    pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data,
            pagination: None,
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(data, message)
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            response_status_list: status_list(self.status, "success", self.message),
            response_object: ResponseObject {
                data: Some(self.data),
                pagination: self.pagination,
                error: None,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Error response; built from [`DomainError`] or by the extractors.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    /// Goes to `statusDesc`
    pub message: String,
    pub error: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status,
            error: ErrorBody {
                code: code.into(),
                message: message.clone(),
                details: None,
            },
            message,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.error.details = Some(details.into());
        self
    }

    pub fn validation(details: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "ValidationError", "Validation failed")
            .with_details(details)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden", message)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Rejected(rejection) => {
                let status = match rejection {
                    ScheduleRejection::ScheduleNotFound { .. } => StatusCode::NOT_FOUND,
                    _ => StatusCode::BAD_REQUEST,
                };
                ApiError::new(status, rejection.code(), rejection.to_string())
            }
            DomainError::NotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, "NotFound", err.to_string())
            }
            DomainError::Validation(msg) => ApiError::validation(msg),
            DomainError::Conflict(msg) => ApiError::new(StatusCode::CONFLICT, "Conflict", msg),
            DomainError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DatabaseError",
                    "Internal server error",
                )
            }
            DomainError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "Internal server error",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body: Envelope<()> = Envelope {
            response_status_list: status_list(self.status, "error", self.message),
            response_object: ResponseObject {
                data: None,
                pagination: None,
                error: Some(self.error),
            },
        };
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
