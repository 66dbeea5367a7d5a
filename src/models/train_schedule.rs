use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "train_schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub schedule_id: String,
    pub train_id: String,
    pub station_id: String,
    /// Copied from the station when the stop is created
    pub station_name: String,
    pub stop_number: i32,
    pub platform_number: i32,
    /// `HH:MM:SS`; NULL only on a start stop
    pub arrival_time: Option<String>,
    /// `HH:MM:SS`; NULL only on an end stop
    pub departure_time: Option<String>,
    pub day_offset: i32,
    pub is_start: bool,
    pub is_end: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::train::Entity",
        from = "Column::TrainId",
        to = "super::train::Column::TrainId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Train,
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::StationId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Station,
}

impl Related<super::train::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Train.def()
    }
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Stop {
    fn from(m: Model) -> Self {
        Self {
            schedule_id: m.schedule_id,
            train_id: m.train_id,
            station_id: m.station_id,
            station_name: m.station_name,
            stop_number: m.stop_number,
            platform_number: m.platform_number,
            arrival_time: m.arrival_time,
            departure_time: m.departure_time,
            day_offset: m.day_offset,
            is_start: m.is_start,
            is_end: m.is_end,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
