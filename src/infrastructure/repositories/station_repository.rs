//! SeaORM implementation of StationRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};

use crate::domain::{
    CreateStationInput, DomainError, Page, PageRequest, Station, StationRepository,
    UpdateStationInput,
};
use crate::models::station::{ActiveModel, Column, Entity as StationEntity};
use crate::models::train_schedule::{self, Entity as ScheduleEntity};

/// SeaORM-based implementation of StationRepository
pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Name or location contains `search`, newest first
fn matching(search: &str) -> Select<StationEntity> {
    let mut query = StationEntity::find();
    if !search.is_empty() {
        query = query.filter(
            Condition::any()
                .add(Column::StationName.contains(search))
                .add(Column::StationLocation.contains(search)),
        );
    }
    query
        .order_by_desc(Column::CreatedAt)
        .order_by_asc(Column::StationName)
}

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn find_page(&self, page: &PageRequest) -> Result<Page<Station>, DomainError> {
        let paginator = matching(&page.search).paginate(&self.db, page.limit);
        let total = paginator.num_items().await?;
        let stations = paginator.fetch_page(page.page - 1).await?;

        Ok(Page {
            items: stations.into_iter().map(Station::from).collect(),
            total,
        })
    }

    async fn find_matching(&self, search: &str) -> Result<Vec<Station>, DomainError> {
        let stations = matching(search).all(&self.db).await?;
        Ok(stations.into_iter().map(Station::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Station>, DomainError> {
        let station = StationEntity::find_by_id(id.to_owned()).one(&self.db).await?;
        Ok(station.map(Station::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Station>, DomainError> {
        let station = StationEntity::find()
            .filter(Column::StationName.eq(name))
            .one(&self.db)
            .await?;
        Ok(station.map(Station::from))
    }

    async fn find_by_location(&self, location: &str) -> Result<Option<Station>, DomainError> {
        let station = StationEntity::find()
            .filter(Column::StationLocation.eq(location))
            .one(&self.db)
            .await?;
        Ok(station.map(Station::from))
    }

    async fn create(&self, input: CreateStationInput) -> Result<Station, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let station = ActiveModel {
            station_id: Set(uuid::Uuid::new_v4().to_string()),
            station_name: Set(input.station_name),
            station_location: Set(input.station_location),
            total_platform: Set(input.total_platform),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let result = station.insert(&self.db).await?;
        Ok(Station::from(result))
    }

    async fn update(&self, id: &str, input: UpdateStationInput) -> Result<Station, DomainError> {
        let station = StationEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::NotFound("Station".to_string()))?;

        let mut active: ActiveModel = station.into();
        if let Some(name) = input.station_name {
            active.station_name = Set(name);
        }
        if let Some(location) = input.station_location {
            active.station_location = Set(location);
        }
        if let Some(total_platform) = input.total_platform {
            active.total_platform = Set(Some(total_platform));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;
        Ok(Station::from(updated))
    }

    async fn delete_with_schedules(&self, id: &str) -> Result<u64, DomainError> {
        let txn = self.db.begin().await?;

        let stops = ScheduleEntity::delete_many()
            .filter(train_schedule::Column::StationId.eq(id))
            .exec(&txn)
            .await?;

        let result = StationEntity::delete_by_id(id.to_owned()).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound("Station".to_string()));
        }

        txn.commit().await?;
        Ok(stops.rows_affected)
    }
}
