//! Tariff entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Tariff kind tag as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TariffKind {
    /// Rate per cubic meter of water
    #[sea_orm(string_value = "water")]
    Water,
    /// Rate per square meter of apartment area
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

/// Tariff model - one price rule per cost category
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tariffs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Cost category this tariff prices
    pub kind: TariffKind,

    /// Rate per unit (per m³ of water, per m² of area)
    pub price: f64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
