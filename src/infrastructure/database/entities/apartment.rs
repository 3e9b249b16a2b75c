//! Apartment entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "apartments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub house_id: i32,

    /// Floor area in square meters
    pub area: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::house::Entity",
        from = "Column::HouseId",
        to = "super::house::Column::Id"
    )]
    House,

    #[sea_orm(has_many = "super::water_meter::Entity")]
    WaterMeters,
}

impl Related<super::house::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::House.def()
    }
}

impl Related<super::water_meter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WaterMeters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
