//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Offset/limit request shared by the list endpoints
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub search: String,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u64 = 10;

    /// Clamp page and limit to at least 1
    pub fn new(page: Option<u64>, limit: Option<u64>, search: Option<String>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).max(1),
            search: search.unwrap_or_default(),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

/// One page of results with the total number of matching rows
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Train data for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Train {
    pub train_id: String,
    pub train_name: String,
    pub total_seats: Option<i32>,
    pub seats_per_coach: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateTrainInput {
    pub train_name: String,
    pub total_seats: Option<i32>,
    pub seats_per_coach: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTrainInput {
    pub train_name: Option<String>,
    pub total_seats: Option<i32>,
    pub seats_per_coach: Option<i32>,
}

impl UpdateTrainInput {
    pub fn is_empty(&self) -> bool {
        self.train_name.is_none() && self.total_seats.is_none() && self.seats_per_coach.is_none()
    }
}

/// Repository trait for Train entity
#[async_trait]
pub trait TrainRepository: Send + Sync {
    /// Trains whose name contains `search` (case-insensitive), newest first
    async fn find_page(&self, page: &PageRequest) -> Result<Page<Train>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Train>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Train>, DomainError>;

    async fn create(&self, input: CreateTrainInput) -> Result<Train, DomainError>;

    async fn update(&self, id: &str, input: UpdateTrainInput) -> Result<Train, DomainError>;

    /// Delete a train and all of its stops in one transaction.
    /// Returns the number of stops removed.
    async fn delete_with_schedules(&self, id: &str) -> Result<u64, DomainError>;
}

/// Station data for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: String,
    pub station_name: String,
    pub station_location: String,
    pub total_platform: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateStationInput {
    pub station_name: String,
    pub station_location: String,
    pub total_platform: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateStationInput {
    pub station_name: Option<String>,
    pub station_location: Option<String>,
    pub total_platform: Option<i32>,
}

impl UpdateStationInput {
    pub fn is_empty(&self) -> bool {
        self.station_name.is_none()
            && self.station_location.is_none()
            && self.total_platform.is_none()
    }
}

/// Repository trait for Station entity
#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Stations whose name or location contains `search`, newest first
    async fn find_page(&self, page: &PageRequest) -> Result<Page<Station>, DomainError>;

    /// Same filter as `find_page`, without offset/limit
    async fn find_matching(&self, search: &str) -> Result<Vec<Station>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Station>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Station>, DomainError>;

    async fn find_by_location(&self, location: &str) -> Result<Option<Station>, DomainError>;

    async fn create(&self, input: CreateStationInput) -> Result<Station, DomainError>;

    async fn update(&self, id: &str, input: UpdateStationInput) -> Result<Station, DomainError>;

    /// Delete a station and every stop referencing it in one transaction.
    /// Returns the number of stops removed.
    async fn delete_with_schedules(&self, id: &str) -> Result<u64, DomainError>;
}

/// A persisted stop: one train at one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub schedule_id: String,
    pub train_id: String,
    pub station_id: String,
    pub station_name: String,
    pub stop_number: i32,
    pub platform_number: i32,
    pub arrival_time: Option<String>,
    pub departure_time: Option<String>,
    pub day_offset: i32,
    pub is_start: bool,
    pub is_end: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Candidate stop for creation
#[derive(Debug, Clone, PartialEq)]
pub struct NewStop {
    pub train_id: String,
    pub station_id: String,
    pub station_name: String,
    pub stop_number: i32,
    pub platform_number: i32,
    pub arrival_time: String,
    pub departure_time: String,
    pub day_offset: i32,
    pub is_start: bool,
    pub is_end: bool,
}

/// Partial stop update.
///
/// `arrival_time`/`departure_time` distinguish "leave unchanged" (`None`)
/// from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopPatch {
    pub train_id: Option<String>,
    pub station_id: Option<String>,
    pub station_name: Option<String>,
    pub stop_number: Option<i32>,
    pub platform_number: Option<i32>,
    pub arrival_time: Option<Option<String>>,
    pub departure_time: Option<Option<String>>,
    pub day_offset: Option<i32>,
    pub is_start: Option<bool>,
    pub is_end: Option<bool>,
}

impl StopPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Repository trait for train schedule stops
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// All stops of a train, ordered by stop number
    async fn find_by_train(&self, train_id: &str) -> Result<Vec<Stop>, DomainError>;

    async fn find_by_train_and_station(
        &self,
        train_id: &str,
        station_id: &str,
    ) -> Result<Option<Stop>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Stop>, DomainError>;

    /// All stops at a station, ordered by departure time
    async fn find_by_station(&self, station_id: &str) -> Result<Vec<Stop>, DomainError>;

    /// Stops whose station name contains `search`, newest first
    async fn find_page(&self, page: &PageRequest) -> Result<Page<Stop>, DomainError>;

    async fn create(&self, stop: NewStop) -> Result<Stop, DomainError>;

    async fn update(&self, id: &str, patch: StopPatch) -> Result<Stop, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}
