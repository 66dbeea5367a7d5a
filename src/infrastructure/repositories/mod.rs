//! Repository implementations using SeaORM

pub mod schedule_repository;
pub mod station_repository;
pub mod train_repository;

pub use schedule_repository::SeaOrmScheduleRepository;
pub use station_repository::SeaOrmStationRepository;
pub use train_repository::SeaOrmTrainRepository;
