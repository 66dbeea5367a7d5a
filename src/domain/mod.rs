//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no Axum).
//! Repository traits, the schedule consistency rules and domain error types.

pub mod consistency;
pub mod errors;
pub mod repositories;
pub mod stop_time;

pub use consistency::{
    ScheduleConsistencyEngine, TimeComparison, ValidatedPatch, ValidatedStop,
    START_WINDOW_LAST_HOUR,
};
pub use errors::{DomainError, ScheduleRejection};
pub use repositories::*;
pub use stop_time::{compare_times, ScheduledInstant, StopTime, TimeFormatError};
