use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub station_id: String,
    pub station_name: String,
    /// Unique across stations, like the name
    pub station_location: String,
    pub total_platform: Option<i32>,
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

impl From<Model> for crate::domain::Station {
    fn from(m: Model) -> Self {
        Self {
            station_id: m.station_id,
            station_name: m.station_name,
            station_location: m.station_location,
            total_platform: m.total_platform,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
