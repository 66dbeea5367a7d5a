use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use railway::db;
use railway::domain::{
    CreateStationInput, CreateTrainInput, DomainError, NewStop, Page, PageRequest,
    ScheduleConsistencyEngine, ScheduleRejection, Station, StationRepository, Stop, StopPatch,
    TimeComparison, UpdateStationInput,
};
use railway::infrastructure::AppState;
use railway::services::{ScheduleService, station_service, train_service};

async fn setup_state(comparison: TimeComparison) -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db, comparison)
}

async fn seed_train(state: &AppState, name: &str) -> String {
    train_service::create_train(
        state.train_repo.as_ref(),
        CreateTrainInput {
            train_name: name.to_string(),
            total_seats: Some(400),
            seats_per_coach: Some(50),
        },
    )
    .await
    .expect("Failed to create train")
    .train_id
}

async fn seed_station(state: &AppState, name: &str) -> String {
    station_service::create_station(
        state.station_repo.as_ref(),
        CreateStationInput {
            station_name: name.to_string(),
            station_location: format!("{} location", name),
            total_platform: Some(4),
        },
    )
    .await
    .expect("Failed to create station")
    .station_id
}

fn stop(train_id: &str, station_id: &str, n: i32, arrival: &str, departure: &str) -> NewStop {
    NewStop {
        train_id: train_id.to_string(),
        station_id: station_id.to_string(),
        station_name: String::new(),
        stop_number: n,
        platform_number: 1,
        arrival_time: arrival.to_string(),
        departure_time: departure.to_string(),
        day_offset: 0,
        is_start: false,
        is_end: false,
    }
}

fn rejection(err: DomainError) -> ScheduleRejection {
    match err {
        DomainError::Rejected(r) => r,
        other => panic!("expected a rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_fills_station_name_and_normalizes_times() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Subarna Express").await;
    let dhaka = seed_station(&state, "Dhaka").await;

    let created = state
        .schedules
        .create(NewStop {
            is_start: true,
            ..stop(&train, &dhaka, 1, "7:00", "07:15")
        })
        .await
        .unwrap();

    assert_eq!(created.station_name, "Dhaka");
    assert_eq!(created.arrival_time.as_deref(), Some("07:00:00"));
    assert_eq!(created.departure_time.as_deref(), Some("07:15:00"));
    assert_eq!(created.day_offset, 0);
}

#[tokio::test]
async fn test_create_requires_existing_train_and_station() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Mohanagar").await;
    let station = seed_station(&state, "Comilla").await;

    let err = state
        .schedules
        .create(stop("missing", &station, 1, "08:00", "08:10"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(ref what) if what == "Train"));

    let err = state
        .schedules
        .create(stop(&train, "missing", 1, "08:00", "08:10"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(ref what) if what == "Station"));
}

#[tokio::test]
async fn test_neighbor_ordering_through_storage() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Turna").await;
    let a = seed_station(&state, "A").await;
    let b = seed_station(&state, "B").await;
    let c = seed_station(&state, "C").await;

    state
        .schedules
        .create(stop(&train, &a, 1, "08:00", "08:10"))
        .await
        .unwrap();

    let err = state
        .schedules
        .create(stop(&train, &b, 2, "08:05", "08:20"))
        .await
        .unwrap_err();
    assert!(matches!(
        rejection(err),
        ScheduleRejection::ArrivalBeforePreviousDeparture { .. }
    ));

    state
        .schedules
        .create(stop(&train, &b, 2, "09:00", "09:10"))
        .await
        .unwrap();

    let err = state
        .schedules
        .create(stop(&train, &c, 3, "09:05", "09:40"))
        .await
        .unwrap_err();
    assert!(matches!(
        rejection(err),
        ScheduleRejection::ArrivalBeforePreviousDeparture { .. }
    ));
    state
        .schedules
        .create(stop(&train, &c, 3, "09:30", "09:40"))
        .await
        .unwrap();

    let stops = state.schedules.find_by_train(&train).await.unwrap();
    let numbers: Vec<i32> = stops.iter().map(|s| s.stop_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_overnight_journey_depends_on_comparison_mode() {
    for (mode, accepted) in [
        (TimeComparison::DayAware, true),
        (TimeComparison::ClockOnly, false),
    ] {
        let state = setup_state(mode).await;
        let train = seed_train(&state, "Night Mail").await;
        let a = seed_station(&state, "Chittagong").await;
        let b = seed_station(&state, "Sylhet").await;

        state
            .schedules
            .create(stop(&train, &a, 1, "22:30", "23:00"))
            .await
            .unwrap();

        let result = state
            .schedules
            .create(NewStop {
                day_offset: 1,
                ..stop(&train, &b, 2, "01:00", "01:10")
            })
            .await;

        assert_eq!(result.is_ok(), accepted, "mode {}", mode);
    }
}

#[tokio::test]
async fn test_update_is_idempotent() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Ekota").await;
    let a = seed_station(&state, "Rajshahi").await;
    let b = seed_station(&state, "Natore").await;

    state
        .schedules
        .create(stop(&train, &a, 1, "08:00", "08:10"))
        .await
        .unwrap();
    let second = state
        .schedules
        .create(stop(&train, &b, 2, "09:00", "09:10"))
        .await
        .unwrap();

    let patch = StopPatch {
        arrival_time: Some(Some("9:05".to_string())),
        platform_number: Some(3),
        ..Default::default()
    };

    let first = state
        .schedules
        .update(&second.schedule_id, patch.clone())
        .await
        .unwrap();
    let again = state
        .schedules
        .update(&second.schedule_id, patch)
        .await
        .unwrap();

    let strip = |s: &Stop| Stop {
        updated_at: String::new(),
        ..s.clone()
    };
    assert_eq!(strip(&first), strip(&again));
    assert_eq!(again.arrival_time.as_deref(), Some("09:05:00"));
    assert_eq!(again.platform_number, 3);
}

#[tokio::test]
async fn test_empty_patch_is_a_validation_error() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Padma").await;
    let a = seed_station(&state, "Khulna").await;
    let created = state
        .schedules
        .create(stop(&train, &a, 1, "08:00", "08:10"))
        .await
        .unwrap();

    let err = state
        .schedules
        .update(&created.schedule_id, StopPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_update_missing_schedule() {
    let state = setup_state(TimeComparison::DayAware).await;
    let err = state
        .schedules
        .update(
            "nope",
            StopPatch {
                platform_number: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        rejection(err),
        ScheduleRejection::ScheduleNotFound { .. }
    ));

    let err = state.schedules.delete("nope").await.unwrap_err();
    assert!(matches!(
        rejection(err),
        ScheduleRejection::ScheduleNotFound { .. }
    ));
}

#[tokio::test]
async fn test_clearing_times_follows_flags() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Sundarban").await;
    let a = seed_station(&state, "Jessore").await;
    let b = seed_station(&state, "Benapole").await;

    let first = state
        .schedules
        .create(NewStop {
            is_start: true,
            ..stop(&train, &a, 1, "06:00", "06:10")
        })
        .await
        .unwrap();
    let last = state
        .schedules
        .create(stop(&train, &b, 2, "07:00", "07:10"))
        .await
        .unwrap();

    let cleared = state
        .schedules
        .update(
            &first.schedule_id,
            StopPatch {
                arrival_time: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.arrival_time, None);

    let err = state
        .schedules
        .update(
            &last.schedule_id,
            StopPatch {
                departure_time: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        rejection(err),
        ScheduleRejection::NullDepartureWithoutEndFlag
    );

    let ended = state
        .schedules
        .update(
            &last.schedule_id,
            StopPatch {
                departure_time: Some(None),
                is_end: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ended.departure_time, None);
    assert!(ended.is_end);
}

#[tokio::test]
async fn test_moving_a_stop_to_another_train() {
    let state = setup_state(TimeComparison::DayAware).await;
    let t1 = seed_train(&state, "Upaban").await;
    let t2 = seed_train(&state, "Parabat").await;
    let a = seed_station(&state, "Srimangal").await;
    let b = seed_station(&state, "Akhaura").await;

    let moving = state
        .schedules
        .create(stop(&t1, &a, 1, "08:00", "08:10"))
        .await
        .unwrap();
    state
        .schedules
        .create(stop(&t2, &b, 1, "08:00", "08:10"))
        .await
        .unwrap();

    // Collides with t2's stop 1
    let err = state
        .schedules
        .update(
            &moving.schedule_id,
            StopPatch {
                train_id: Some(t2.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        rejection(err),
        ScheduleRejection::DuplicateStopNumber { stop_number: 1, .. }
    ));

    let moved = state
        .schedules
        .update(
            &moving.schedule_id,
            StopPatch {
                train_id: Some(t2.clone()),
                stop_number: Some(2),
                arrival_time: Some(Some("09:00".to_string())),
                departure_time: Some(Some("09:10".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.train_id, t2);
    assert!(state.schedules.find_by_train(&t1).await.unwrap().is_empty());
    assert_eq!(state.schedules.find_by_train(&t2).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_station_delete_cascades_to_stops() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Agnibina").await;
    let a = seed_station(&state, "Tangail").await;
    let b = seed_station(&state, "Jamalpur").await;

    state
        .schedules
        .create(stop(&train, &a, 1, "08:00", "08:10"))
        .await
        .unwrap();
    state
        .schedules
        .create(stop(&train, &b, 2, "09:00", "09:10"))
        .await
        .unwrap();

    station_service::delete_station(state.station_repo.as_ref(), &a)
        .await
        .unwrap();

    let remaining = state.schedules.find_by_train(&train).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].station_id, b);
    assert!(state.schedules.find_by_station(&a).await.unwrap().is_empty());

    let err = station_service::delete_station(state.station_repo.as_ref(), &a)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_train_delete_cascades_and_forgets_lock() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Chitra").await;
    let a = seed_station(&state, "Bogura").await;

    state
        .schedules
        .create(stop(&train, &a, 1, "08:00", "08:10"))
        .await
        .unwrap();
    assert!(!state.train_locks.is_empty());

    train_service::delete_train(state.train_repo.as_ref(), &state.train_locks, &train)
        .await
        .unwrap();

    assert!(state.schedules.find_by_station(&a).await.unwrap().is_empty());
    assert!(state.train_locks.is_empty());
    let err = train_service::get_train(state.train_repo.as_ref(), &train)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_unique_indexes_guard_storage() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Kalni").await;
    let a = seed_station(&state, "Bhairab").await;
    let b = seed_station(&state, "Kishoreganj").await;

    state
        .schedule_repo
        .create(NewStop {
            station_name: "Bhairab".into(),
            ..stop(&train, &a, 1, "08:00:00", "08:10:00")
        })
        .await
        .unwrap();

    // Straight to the repository, skipping the engine
    let err = state
        .schedule_repo
        .create(NewStop {
            station_name: "Kishoreganj".into(),
            ..stop(&train, &b, 1, "09:00:00", "09:10:00")
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)), "got {:?}", err);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_stop_number_exactly_one_wins() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Drutojan").await;

    let mut stations = Vec::new();
    for i in 0..8 {
        stations.push(seed_station(&state, &format!("Halt {}", i)).await);
    }

    let state = Arc::new(state);
    let mut handles = Vec::new();
    for station in stations {
        let state = state.clone();
        let train = train.clone();
        handles.push(tokio::spawn(async move {
            state
                .schedules
                .create(stop(&train, &station, 1, "08:00", "08:10"))
                .await
        }));
    }

    let mut wins = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(DomainError::Rejected(ScheduleRejection::DuplicateStopNumber { .. })) => {}
            Err(DomainError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error {:?}", other),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(state.schedules.find_by_train(&train).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_searches_station_name_and_counts() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Tista").await;
    let names = ["Dinajpur", "Parbatipur", "Dinajpur Cantt"];
    for (i, name) in names.iter().enumerate() {
        let station = seed_station(&state, name).await;
        let hour = 8 + i as i32;
        state
            .schedules
            .create(stop(
                &train,
                &station,
                i as i32 + 1,
                &format!("{:02}:00", hour),
                &format!("{:02}:10", hour),
            ))
            .await
            .unwrap();
    }

    let page = PageRequest::new(Some(1), Some(1), Some("dinajpur".into()));
    let result = state.schedules.list(&page).await.unwrap();
    assert_eq!(result.total, 2);
    assert_eq!(result.items.len(), 1);
}

#[tokio::test]
async fn test_create_waiting_on_a_deleted_train_reports_not_found() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Banalata").await;
    let station = seed_station(&state, "Rajbari").await;

    let guard = state.train_locks.acquire(&train).await;
    let waiting = {
        let state = state.clone();
        let train = train.clone();
        tokio::spawn(async move {
            state
                .schedules
                .create(stop(&train, &station, 1, "08:00", "08:10"))
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    state.train_repo.delete_with_schedules(&train).await.unwrap();
    drop(guard);

    let err = waiting.await.unwrap().unwrap_err();
    assert!(
        matches!(err, DomainError::NotFound(ref what) if what == "Train"),
        "got {:?}",
        err
    );
}

/// Reports a station that was deleted after the first lookup
struct StaleStationRepository {
    inner: Arc<dyn StationRepository>,
    snapshot: Station,
    served: AtomicBool,
}

#[async_trait]
impl StationRepository for StaleStationRepository {
    async fn find_page(&self, page: &PageRequest) -> Result<Page<Station>, DomainError> {
        self.inner.find_page(page).await
    }

    async fn find_matching(&self, search: &str) -> Result<Vec<Station>, DomainError> {
        self.inner.find_matching(search).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Station>, DomainError> {
        if id == self.snapshot.station_id && !self.served.swap(true, Ordering::SeqCst) {
            return Ok(Some(self.snapshot.clone()));
        }
        self.inner.find_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Station>, DomainError> {
        self.inner.find_by_name(name).await
    }

    async fn find_by_location(&self, location: &str) -> Result<Option<Station>, DomainError> {
        self.inner.find_by_location(location).await
    }

    async fn create(&self, input: CreateStationInput) -> Result<Station, DomainError> {
        self.inner.create(input).await
    }

    async fn update(&self, id: &str, input: UpdateStationInput) -> Result<Station, DomainError> {
        self.inner.update(id, input).await
    }

    async fn delete_with_schedules(&self, id: &str) -> Result<u64, DomainError> {
        self.inner.delete_with_schedules(id).await
    }
}

#[tokio::test]
async fn test_station_deleted_before_insert_reports_not_found() {
    let state = setup_state(TimeComparison::DayAware).await;
    let train = seed_train(&state, "Rupsha").await;
    let station_id = seed_station(&state, "Kushtia").await;
    let snapshot = station_service::get_station(state.station_repo.as_ref(), &station_id)
        .await
        .unwrap();

    station_service::delete_station(state.station_repo.as_ref(), &station_id)
        .await
        .unwrap();

    let schedules = ScheduleService::new(
        ScheduleConsistencyEngine::default(),
        state.train_repo.clone(),
        Arc::new(StaleStationRepository {
            inner: state.station_repo.clone(),
            snapshot,
            served: AtomicBool::new(false),
        }),
        state.schedule_repo.clone(),
        state.train_locks.clone(),
    );

    let err = schedules
        .create(stop(&train, &station_id, 1, "08:00", "08:10"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, DomainError::NotFound(ref what) if what == "Station"),
        "got {:?}",
        err
    );
    assert!(state.schedules.find_by_train(&train).await.unwrap().is_empty());
}
