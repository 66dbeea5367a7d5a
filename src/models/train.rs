use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trains")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub train_id: String,
    pub train_name: String,
    pub total_seats: Option<i32>,
    pub seats_per_coach: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::train_schedule::Entity")]
    TrainSchedule,
}

impl Related<super::train_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainSchedule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Train {
    fn from(m: Model) -> Self {
        Self {
            train_id: m.train_id,
            train_name: m.train_name,
            total_seats: m.total_seats,
            seats_per_coach: m.seats_per_coach,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
