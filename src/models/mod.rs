pub mod station;
pub mod train;
pub mod train_schedule;
