//! Water meter entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "water_meters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub apartment_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::apartment::Entity",
        from = "Column::ApartmentId",
        to = "super::apartment::Column::Id"
    )]
    Apartment,

    #[sea_orm(has_many = "super::water_reading::Entity")]
    WaterReadings,
}

impl Related<super::apartment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Apartment.def()
    }
}

impl Related<super::water_reading::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WaterReadings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
