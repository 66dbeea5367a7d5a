//! SeaORM implementation of TrainRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::domain::{
    CreateTrainInput, DomainError, Page, PageRequest, Train, TrainRepository, UpdateTrainInput,
};
use crate::models::train::{ActiveModel, Column, Entity as TrainEntity};
use crate::models::train_schedule::{self, Entity as ScheduleEntity};

/// SeaORM-based implementation of TrainRepository
pub struct SeaOrmTrainRepository {
    db: DatabaseConnection,
}

impl SeaOrmTrainRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TrainRepository for SeaOrmTrainRepository {
    async fn find_page(&self, page: &PageRequest) -> Result<Page<Train>, DomainError> {
        let mut query = TrainEntity::find();
        if !page.search.is_empty() {
            // SQLite LIKE is case-insensitive for ASCII
            query = query.filter(Column::TrainName.contains(&page.search));
        }

        let paginator = query
            .order_by_desc(Column::CreatedAt)
            .order_by_asc(Column::TrainName)
            .paginate(&self.db, page.limit);
        let total = paginator.num_items().await?;
        let trains = paginator.fetch_page(page.page - 1).await?;

        Ok(Page {
            items: trains.into_iter().map(Train::from).collect(),
            total,
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Train>, DomainError> {
        let train = TrainEntity::find_by_id(id.to_owned()).one(&self.db).await?;
        Ok(train.map(Train::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Train>, DomainError> {
        let train = TrainEntity::find()
            .filter(Column::TrainName.eq(name))
            .one(&self.db)
            .await?;
        Ok(train.map(Train::from))
    }

    async fn create(&self, input: CreateTrainInput) -> Result<Train, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let train = ActiveModel {
            train_id: Set(uuid::Uuid::new_v4().to_string()),
            train_name: Set(input.train_name),
            total_seats: Set(input.total_seats),
            seats_per_coach: Set(input.seats_per_coach),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let result = train.insert(&self.db).await?;
        Ok(Train::from(result))
    }

    async fn update(&self, id: &str, input: UpdateTrainInput) -> Result<Train, DomainError> {
        let train = TrainEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::NotFound("Train".to_string()))?;

        let mut active: ActiveModel = train.into();
        if let Some(name) = input.train_name {
            active.train_name = Set(name);
        }
        if let Some(total_seats) = input.total_seats {
            active.total_seats = Set(Some(total_seats));
        }
        if let Some(seats_per_coach) = input.seats_per_coach {
            active.seats_per_coach = Set(Some(seats_per_coach));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;
        Ok(Train::from(updated))
    }

    async fn delete_with_schedules(&self, id: &str) -> Result<u64, DomainError> {
        let txn = self.db.begin().await?;

        let stops = ScheduleEntity::delete_many()
            .filter(train_schedule::Column::TrainId.eq(id))
            .exec(&txn)
            .await?;

        let result = TrainEntity::delete_by_id(id.to_owned()).exec(&txn).await?;
        if result.rows_affected == 0 {
            // dropping txn rolls back
            return Err(DomainError::NotFound("Train".to_string()));
        }

        txn.commit().await?;
        Ok(stops.rows_affected)
    }
}
