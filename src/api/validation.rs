//! JSON body extraction with field validation.

use axum::{
    Json, async_trait,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use super::response::ApiError;

/// Field-level checks run after a body deserializes
pub trait Validate {
    /// One message per failed field
    fn validate(&self) -> Result<(), Vec<String>>;
}

/// Like `Json<T>`, but malformed bodies and failed [`Validate`] checks
/// become a 400 "Validation failed" envelope.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ApiError::validation(errors.join("; ")))?;

        Ok(ValidatedJson(value))
    }
}

/// Non-blank and at most `max_len` characters
pub fn require_text(errors: &mut Vec<String>, field: &str, value: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.push(format!("{} should not be empty", field));
    } else if value.chars().count() > max_len {
        errors.push(format!("{} must be at most {} characters", field, max_len));
    }
}

pub fn require_positive(errors: &mut Vec<String>, field: &str, value: i32) {
    if value < 1 {
        errors.push(format!("{} must be a positive number", field));
    }
}

pub fn finish(errors: Vec<String>) -> Result<(), Vec<String>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Pair with `#[serde(default)]`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}
