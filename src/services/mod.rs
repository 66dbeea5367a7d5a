//! Services Layer
//!
//! Business operations called by the HTTP handlers. Handlers only parse
//! input and shape responses.

pub mod schedule_service;
pub mod station_service;
pub mod train_service;

pub use schedule_service::ScheduleService;
