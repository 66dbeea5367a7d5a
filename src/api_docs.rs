use crate::api;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::train::create_train,
        api::train::list_trains,
        api::station::list_all_stations,
        api::schedule::create_schedule,
        api::schedule::update_schedule,
    ),
    components(
        schemas(
            api::train::CreateTrainRequest,
            api::train::UpdateTrainRequest,
            api::station::CreateStationRequest,
            api::station::UpdateStationRequest,
            api::station::SearchRequest,
            api::schedule::CreateScheduleRequest,
            api::schedule::UpdateScheduleRequest,
            api::response::Status,
            api::response::StatusList,
            api::response::Pagination,
            api::response::ErrorBody,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "railway", description = "Railway trains, stations and schedules API")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by the admin routes
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
