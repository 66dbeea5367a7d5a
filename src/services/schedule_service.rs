//! Schedule Service - stop writes serialized per train
//!
//! Every create/update takes the owning train's lock, loads the train's
//! current stops, runs them through the consistency engine and persists
//! only what the engine accepted.

use std::sync::Arc;

use crate::domain::{
    DomainError, NewStop, Page, PageRequest, ScheduleConsistencyEngine, ScheduleRejection,
    ScheduleRepository, StationRepository, Stop, StopPatch, TrainRepository,
};
use crate::infrastructure::locks::TrainLocks;

pub struct ScheduleService {
    engine: ScheduleConsistencyEngine,
    trains: Arc<dyn TrainRepository>,
    stations: Arc<dyn StationRepository>,
    schedules: Arc<dyn ScheduleRepository>,
    locks: Arc<TrainLocks>,
}

impl ScheduleService {
    pub fn new(
        engine: ScheduleConsistencyEngine,
        trains: Arc<dyn TrainRepository>,
        stations: Arc<dyn StationRepository>,
        schedules: Arc<dyn ScheduleRepository>,
        locks: Arc<TrainLocks>,
    ) -> Self {
        Self {
            engine,
            trains,
            stations,
            schedules,
            locks,
        }
    }

    pub fn engine(&self) -> &ScheduleConsistencyEngine {
        &self.engine
    }

    async fn require_train(&self, train_id: &str) -> Result<(), DomainError> {
        match self.trains.find_by_id(train_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound("Train".to_string())),
        }
    }

    /// Station display name, failing when the station does not exist
    async fn station_name(&self, station_id: &str) -> Result<String, DomainError> {
        self.stations
            .find_by_id(station_id)
            .await?
            .map(|s| s.station_name)
            .ok_or_else(|| DomainError::NotFound("Station".to_string()))
    }

    async fn require_stop(&self, id: &str) -> Result<Stop, DomainError> {
        self.schedules.find_by_id(id).await?.ok_or_else(|| {
            ScheduleRejection::ScheduleNotFound {
                schedule_id: id.to_string(),
            }
            .into()
        })
    }

    /// Explain a failed stop write.
    ///
    /// Station deletes take no train lock, so a station can disappear between
    /// its existence check and the insert; the foreign key then fails the
    /// write. Report that as the missing train or station.
    async fn missing_reference(
        &self,
        train_id: &str,
        station_id: &str,
        err: DomainError,
    ) -> DomainError {
        if !matches!(err, DomainError::Database(_)) {
            return err;
        }
        if let Err(missing) = self.require_train(train_id).await {
            return missing;
        }
        if let Err(missing) = self.station_name(station_id).await {
            return missing;
        }
        err
    }

    pub async fn create(&self, mut stop: NewStop) -> Result<Stop, DomainError> {
        let station_name = self.station_name(&stop.station_id).await?;
        if stop.station_name.trim().is_empty() {
            stop.station_name = station_name;
        }

        let _guard = self.locks.acquire(&stop.train_id).await;
        // Under the lock: the train may have been deleted while we waited.
        self.require_train(&stop.train_id).await?;
        let siblings = self.schedules.find_by_train(&stop.train_id).await?;

        let validated = self.engine.validate_create(stop, &siblings).map_err(|r| {
            tracing::info!("Stop rejected: {} ({})", r, r.code());
            r
        })?;

        let stop = validated.into_inner();
        let (train_id, station_id) = (stop.train_id.clone(), stop.station_id.clone());
        let created = match self.schedules.create(stop).await {
            Ok(created) => created,
            Err(e) => return Err(self.missing_reference(&train_id, &station_id, e).await),
        };
        tracing::info!(
            "Created stop {} for train {} (stop #{} at {})",
            created.schedule_id,
            created.train_id,
            created.stop_number,
            created.station_name
        );
        Ok(created)
    }

    pub async fn update(&self, id: &str, mut patch: StopPatch) -> Result<Stop, DomainError> {
        if patch.is_empty() {
            return Err(DomainError::Validation("No fields to update".to_string()));
        }

        if let Some(station_id) = &patch.station_id {
            let station_name = self.station_name(station_id).await?;
            if patch.station_name.is_none() {
                patch.station_name = Some(station_name);
            }
        }

        let mut current = self.require_stop(id).await?;
        loop {
            let target = patch.train_id.as_deref().unwrap_or(&current.train_id);
            let _guards = self
                .locks
                .acquire_many(&[current.train_id.as_str(), target])
                .await;

            // The stop may have moved to another train while we waited.
            let fresh = self.require_stop(id).await?;
            if fresh.train_id != current.train_id {
                tracing::debug!("Stop {} moved trains during update, retrying", id);
                current = fresh;
                continue;
            }

            let target = target.to_string();
            self.require_train(&target).await?;
            let siblings = self.schedules.find_by_train(&target).await?;
            let validated = self
                .engine
                .validate_update(id, patch, &fresh, &siblings)
                .map_err(|r| {
                    tracing::info!("Stop update rejected: {} ({})", r, r.code());
                    r
                })?;

            let (train_id, station_id) = (
                validated.merged().train_id.clone(),
                validated.merged().station_id.clone(),
            );
            let updated = match self.schedules.update(id, validated.into_patch()).await {
                Ok(updated) => updated,
                Err(e) => return Err(self.missing_reference(&train_id, &station_id, e).await),
            };
            tracing::info!("Updated stop {} for train {}", id, updated.train_id);
            return Ok(updated);
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let stop = self.require_stop(id).await?;
        let _guard = self.locks.acquire(&stop.train_id).await;

        match self.schedules.delete(id).await {
            Ok(()) => {
                tracing::info!("Deleted stop {} of train {}", id, stop.train_id);
                Ok(())
            }
            Err(DomainError::NotFound(_)) => Err(ScheduleRejection::ScheduleNotFound {
                schedule_id: id.to_string(),
            }
            .into()),
            Err(e) => Err(e),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Stop, DomainError> {
        self.require_stop(id).await
    }

    pub async fn find_by_train(&self, train_id: &str) -> Result<Vec<Stop>, DomainError> {
        self.schedules.find_by_train(train_id).await
    }

    pub async fn find_by_station(&self, station_id: &str) -> Result<Vec<Stop>, DomainError> {
        self.schedules.find_by_station(station_id).await
    }

    pub async fn list(&self, page: &PageRequest) -> Result<Page<Stop>, DomainError> {
        self.schedules.find_page(page).await
    }
}
