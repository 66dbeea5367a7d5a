//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

use super::stop_time::{ScheduledInstant, StopTime};

/// A schedule change refused by the consistency rules.
///
/// Rejections are ordinary outcomes, not faults: they are returned to the
/// caller as-is and never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleRejection {
    InvalidTimeFormat {
        field: &'static str,
        value: String,
    },
    DepartureBeforeArrival {
        arrival: StopTime,
        departure: StopTime,
    },
    DuplicateStationForTrain {
        station_id: String,
        station_name: String,
    },
    InvalidStartWindow {
        arrival: StopTime,
    },
    ArrivalBeforePreviousDeparture {
        previous_station: String,
        previous_departure: ScheduledInstant,
    },
    DepartureAfterNextArrival {
        next_station: String,
        next_arrival: ScheduledInstant,
    },
    DuplicateStartStation {
        station_name: String,
    },
    DuplicateEndStation {
        station_name: String,
    },
    DuplicateStopNumber {
        stop_number: i32,
        station_name: String,
    },
    NullArrivalWithoutStartFlag,
    NullDepartureWithoutEndFlag,
    ScheduleNotFound {
        schedule_id: String,
    },
}

impl ScheduleRejection {
    /// Stable identifier for programmatic handling by API clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTimeFormat { .. } => "InvalidTimeFormat",
            Self::DepartureBeforeArrival { .. } => "DepartureBeforeArrival",
            Self::DuplicateStationForTrain { .. } => "DuplicateStationForTrain",
            Self::InvalidStartWindow { .. } => "InvalidStartWindow",
            Self::ArrivalBeforePreviousDeparture { .. } => "ArrivalBeforePreviousDeparture",
            Self::DepartureAfterNextArrival { .. } => "DepartureAfterNextArrival",
            Self::DuplicateStartStation { .. } => "DuplicateStartStation",
            Self::DuplicateEndStation { .. } => "DuplicateEndStation",
            Self::DuplicateStopNumber { .. } => "DuplicateStopNumber",
            Self::NullArrivalWithoutStartFlag => "NullArrivalWithoutStartFlag",
            Self::NullDepartureWithoutEndFlag => "NullDepartureWithoutEndFlag",
            Self::ScheduleNotFound { .. } => "ScheduleNotFound",
        }
    }
}

impl fmt::Display for ScheduleRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimeFormat { field, value } => write!(
                f,
                "{} must be in valid time format (HH:MM or HH:MM:SS), got '{}'",
                field, value
            ),
            Self::DepartureBeforeArrival { arrival, departure } => write!(
                f,
                "Departure time ({}) must not be before arrival time ({})",
                departure, arrival
            ),
            Self::DuplicateStationForTrain { station_name, .. } => write!(
                f,
                "This train is already scheduled with this station ({})",
                station_name
            ),
            Self::InvalidStartWindow { arrival } => write!(
                f,
                "Start station arrival time should be in the morning, got {}",
                arrival
            ),
            Self::ArrivalBeforePreviousDeparture {
                previous_station,
                previous_departure,
            } => write!(
                f,
                "Arrival time must be after previous station's departure time ({} at {})",
                previous_departure, previous_station
            ),
            Self::DepartureAfterNextArrival {
                next_station,
                next_arrival,
            } => write!(
                f,
                "Departure time must be before next station's arrival time ({} at {})",
                next_arrival, next_station
            ),
            Self::DuplicateStartStation { station_name } => write!(
                f,
                "This train already has a starting station ({}). Only one starting station allowed per train.",
                station_name
            ),
            Self::DuplicateEndStation { station_name } => write!(
                f,
                "This train already has an ending station ({}). Only one ending station allowed per train.",
                station_name
            ),
            Self::DuplicateStopNumber {
                stop_number,
                station_name,
            } => write!(
                f,
                "Stop number {} is already used by station \"{}\". Please choose a different stop number.",
                stop_number, station_name
            ),
            Self::NullArrivalWithoutStartFlag => {
                write!(f, "Arrival time cannot be null unless isStart is true")
            }
            Self::NullDepartureWithoutEndFlag => {
                write!(f, "Departure time cannot be null unless isEnd is true")
            }
            Self::ScheduleNotFound { schedule_id } => {
                write!(f, "Train schedule {} not found", schedule_id)
            }
        }
    }
}

impl std::error::Error for ScheduleRejection {}

#[derive(Debug)]
pub enum DomainError {
    /// Resource not found
    NotFound(String),
    /// Validation error with message
    Validation(String),
    /// Schedule change refused by the consistency rules
    Rejected(ScheduleRejection),
    /// Uniqueness violated at the storage layer
    Conflict(String),
    /// Database/persistence error
    Database(String),
    /// Generic internal error
    Internal(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound(what) => write!(f, "{} not found", what),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Rejected(rejection) => write!(f, "{}", rejection),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<ScheduleRejection> for DomainError {
    fn from(rejection: ScheduleRejection) -> Self {
        DomainError::Rejected(rejection)
    }
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => DomainError::Conflict(msg),
            _ => DomainError::Database(e.to_string()),
        }
    }
}
