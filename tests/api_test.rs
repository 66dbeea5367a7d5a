use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use railway::auth;
use railway::db;
use railway::domain::TimeComparison;
use railway::infrastructure::AppState;
use railway::server;
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

async fn setup_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    server::build_router(AppState::new(db, TimeComparison::DayAware), &[])
}

fn admin_token() -> String {
    auth::create_jwt("test_admin", "admin").expect("Failed to create token")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn status_desc(body: &Value) -> &str {
    body["responseStatusList"]["statusList"][0]["statusDesc"]
        .as_str()
        .unwrap_or_default()
}

async fn create_train(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/train",
        Some(token),
        Some(json!({"train_name": name, "total_seats": 300, "seats_per_coach": 60})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["responseObject"]["data"]["train_id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_station(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/station",
        Some(token),
        Some(json!({
            "station_name": name,
            "station_location": format!("{} city", name),
            "total_platform": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["responseObject"]["data"]["station_id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_health() {
    let app = setup_app().await;
    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_app().await;
    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/schedule"].is_object());
}

#[tokio::test]
async fn test_admin_gate() {
    let app = setup_app().await;

    let (status, body) = send(&app, "POST", "/api/train/list", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["responseStatusList"]["statusList"][0]["statusType"],
        "error"
    );

    let (status, _) = send(&app, "POST", "/api/train/list", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user = auth::create_jwt("rider", "user").unwrap();
    let (status, body) = send(&app, "POST", "/api/train/list", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["responseObject"]["error"]["code"], "Forbidden");

    let (status, _) = send(
        &app,
        "POST",
        "/api/train/list",
        Some(&admin_token()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_train_crud_and_pagination() {
    let app = setup_app().await;
    let token = admin_token();

    for name in ["Suborno", "Sonar Bangla", "Silk City"] {
        create_train(&app, &token, name).await;
    }

    let (status, body) = send(
        &app,
        "POST",
        "/api/train",
        Some(&token),
        Some(json!({"train_name": "Suborno", "total_seats": 1, "seats_per_coach": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(status_desc(&body), "Train name already exists");

    let (status, body) = send(
        &app,
        "POST",
        "/api/train/list?page=1&limit=2&search=s",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["responseObject"]["data"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["responseObject"]["pagination"],
        json!({"currentPage": 1, "limit": 2, "totalPages": 2, "totalItems": 3})
    );

    let id = create_train(&app, &token, "Ekota").await;
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/train/{}", id),
        Some(&token),
        Some(json!({"totalSeats": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["responseObject"]["data"]["total_seats"], 500);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/train/{}", id),
        Some(&token),
        Some(json!({"train_name": "Silk City"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "DELETE", &format!("/api/train/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/api/train/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(status_desc(&body), "Train not found");
}

#[tokio::test]
async fn test_validation_failures() {
    let app = setup_app().await;
    let token = admin_token();

    // Malformed JSON
    let req = Request::builder()
        .method("POST")
        .uri("/api/schedule")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status_desc(&body), "Validation failed");

    let (status, body) = send(
        &app,
        "POST",
        "/api/train",
        Some(&token),
        Some(json!({"train_name": "", "total_seats": 0, "seats_per_coach": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["responseObject"]["error"]["details"].as_str().unwrap();
    assert!(details.contains("train_name"));
    assert!(details.contains("total_seats"));

    let (status, body) = send(
        &app,
        "PUT",
        "/api/station/whatever",
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
}

#[tokio::test]
async fn test_station_uniqueness_and_need_all_data() {
    let app = setup_app().await;
    let token = admin_token();
    create_station(&app, &token, "Kamalapur").await;
    create_station(&app, &token, "Airport").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/station",
        Some(&token),
        Some(json!({
            "station_name": "Other",
            "station_location": "Kamalapur city",
            "total_platform": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(status_desc(&body), "Station location already exists");

    let (status, body) = send(
        &app,
        "POST",
        "/api/station",
        Some(&token),
        Some(json!({
            "station_name": "Kamalapur",
            "station_location": "Elsewhere",
            "total_platform": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(status_desc(&body), "Station name already exists");

    // Open endpoint, body optional
    let (status, body) = send(&app, "POST", "/api/station/list/needAllData", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["responseObject"]["data"].as_array().unwrap().len(), 2);
    assert!(body["responseObject"].get("pagination").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/api/station/list/needAllData",
        None,
        Some(json!({"search": "air"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["responseObject"]["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_schedule_flow_and_rejections() {
    let app = setup_app().await;
    let token = admin_token();
    let train = create_train(&app, &token, "Mohanagar Provati").await;
    let dhaka = create_station(&app, &token, "Dhaka").await;
    let ctg = create_station(&app, &token, "Chattogram").await;

    // Open create, camelCase body
    let (status, body) = send(
        &app,
        "POST",
        "/api/schedule",
        None,
        Some(json!({
            "trainId": train,
            "stationId": dhaka,
            "stopNumber": 1,
            "platformNumber": 2,
            "arrivalTime": "7:30",
            "departureTime": "07:45",
            "isStart": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let first = &body["responseObject"]["data"];
    assert_eq!(first["station_name"], "Dhaka");
    assert_eq!(first["arrival_time"], "07:30:00");
    let first_id = first["schedule_id"].as_str().unwrap().to_string();

    // snake_case aliases are accepted too
    let (status, body) = send(
        &app,
        "POST",
        "/api/schedule",
        None,
        Some(json!({
            "train_id": train,
            "station_id": ctg,
            "stop_number": 2,
            "platform_number": 1,
            "arrival_time": "07:40",
            "departure_time": "07:50"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["responseObject"]["error"]["code"],
        "ArrivalBeforePreviousDeparture"
    );

    let (status, body) = send(
        &app,
        "POST",
        "/api/schedule",
        None,
        Some(json!({
            "trainId": train,
            "stationId": ctg,
            "stopNumber": 2,
            "platformNumber": 1,
            "arrivalTime": "25:00",
            "departureTime": "12:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["responseObject"]["error"]["code"], "InvalidTimeFormat");

    let (status, body) = send(
        &app,
        "POST",
        "/api/schedule",
        None,
        Some(json!({
            "trainId": train,
            "stationId": ctg,
            "stopNumber": 2,
            "platformNumber": 1,
            "arrivalTime": "13:00",
            "departureTime": "13:10",
            "isEnd": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    // Clear the start stop's arrival with explicit null
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/schedule/{}", first_id),
        None,
        Some(json!({"arrival_time": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["responseObject"]["data"]["arrival_time"].is_null());
    assert_eq!(body["responseObject"]["data"]["departure_time"], "07:45:00");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/schedule/train/{}", train),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stops = body["responseObject"]["data"].as_array().unwrap();
    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0]["stop_number"], 1);

    let (status, _) = send(&app, "GET", &format!("/api/schedule/{}", first_id), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/schedule/list?page=1&limit=10",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["responseObject"]["pagination"]["totalItems"], 2);

    // Deleting the station removes its stop
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/station/{}", dhaka),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "DELETE", &format!("/api/schedule/{}", first_id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["responseObject"]["error"]["code"], "ScheduleNotFound");
}
