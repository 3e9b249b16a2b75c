//! Water reading entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "water_readings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub water_meter_id: i32,

    /// Billing month, 1–12
    pub month: i32,

    pub year: i32,

    /// Cumulative value on the meter dial
    pub value: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::water_meter::Entity",
        from = "Column::WaterMeterId",
        to = "super::water_meter::Column::Id"
    )]
    WaterMeter,
}

impl Related<super::water_meter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WaterMeter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
