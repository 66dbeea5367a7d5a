//! SeaORM implementation of ScheduleRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{
    DomainError, NewStop, Page, PageRequest, ScheduleRepository, Stop, StopPatch,
};
use crate::models::train_schedule::{ActiveModel, Column, Entity as ScheduleEntity};

/// SeaORM-based implementation of ScheduleRepository
pub struct SeaOrmScheduleRepository {
    db: DatabaseConnection,
}

impl SeaOrmScheduleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScheduleRepository for SeaOrmScheduleRepository {
    async fn find_by_train(&self, train_id: &str) -> Result<Vec<Stop>, DomainError> {
        let stops = ScheduleEntity::find()
            .filter(Column::TrainId.eq(train_id))
            .order_by_asc(Column::StopNumber)
            .all(&self.db)
            .await?;
        Ok(stops.into_iter().map(Stop::from).collect())
    }

    async fn find_by_train_and_station(
        &self,
        train_id: &str,
        station_id: &str,
    ) -> Result<Option<Stop>, DomainError> {
        let stop = ScheduleEntity::find()
            .filter(Column::TrainId.eq(train_id))
            .filter(Column::StationId.eq(station_id))
            .one(&self.db)
            .await?;
        Ok(stop.map(Stop::from))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Stop>, DomainError> {
        let stop = ScheduleEntity::find_by_id(id.to_owned()).one(&self.db).await?;
        Ok(stop.map(Stop::from))
    }

    async fn find_by_station(&self, station_id: &str) -> Result<Vec<Stop>, DomainError> {
        let stops = ScheduleEntity::find()
            .filter(Column::StationId.eq(station_id))
            .order_by_asc(Column::DepartureTime)
            .order_by_asc(Column::TrainId)
            .all(&self.db)
            .await?;
        Ok(stops.into_iter().map(Stop::from).collect())
    }

    async fn find_page(&self, page: &PageRequest) -> Result<Page<Stop>, DomainError> {
        let mut query = ScheduleEntity::find();
        if !page.search.is_empty() {
            query = query.filter(Column::StationName.contains(&page.search));
        }

        let paginator = query
            .order_by_desc(Column::CreatedAt)
            .order_by_asc(Column::TrainId)
            .order_by_asc(Column::StopNumber)
            .paginate(&self.db, page.limit);
        let total = paginator.num_items().await?;
        let stops = paginator.fetch_page(page.page - 1).await?;

        Ok(Page {
            items: stops.into_iter().map(Stop::from).collect(),
            total,
        })
    }

    async fn create(&self, stop: NewStop) -> Result<Stop, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let schedule = ActiveModel {
            schedule_id: Set(uuid::Uuid::new_v4().to_string()),
            train_id: Set(stop.train_id),
            station_id: Set(stop.station_id),
            station_name: Set(stop.station_name),
            stop_number: Set(stop.stop_number),
            platform_number: Set(stop.platform_number),
            arrival_time: Set(Some(stop.arrival_time)),
            departure_time: Set(Some(stop.departure_time)),
            day_offset: Set(stop.day_offset),
            is_start: Set(stop.is_start),
            is_end: Set(stop.is_end),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let result = schedule.insert(&self.db).await?;
        Ok(Stop::from(result))
    }

    async fn update(&self, id: &str, patch: StopPatch) -> Result<Stop, DomainError> {
        let existing = ScheduleEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::NotFound("Train schedule".to_string()))?;

        let mut active: ActiveModel = existing.into();
        if let Some(train_id) = patch.train_id {
            active.train_id = Set(train_id);
        }
        if let Some(station_id) = patch.station_id {
            active.station_id = Set(station_id);
        }
        if let Some(station_name) = patch.station_name {
            active.station_name = Set(station_name);
        }
        if let Some(stop_number) = patch.stop_number {
            active.stop_number = Set(stop_number);
        }
        if let Some(platform_number) = patch.platform_number {
            active.platform_number = Set(platform_number);
        }
        if let Some(arrival) = patch.arrival_time {
            active.arrival_time = Set(arrival);
        }
        if let Some(departure) = patch.departure_time {
            active.departure_time = Set(departure);
        }
        if let Some(day_offset) = patch.day_offset {
            active.day_offset = Set(day_offset);
        }
        if let Some(is_start) = patch.is_start {
            active.is_start = Set(is_start);
        }
        if let Some(is_end) = patch.is_end {
            active.is_end = Set(is_end);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;
        Ok(Stop::from(updated))
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = ScheduleEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound("Train schedule".to_string()));
        }
        Ok(())
    }
}
