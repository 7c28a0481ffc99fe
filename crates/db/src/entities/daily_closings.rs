//! `SeaORM` Entity for daily_closings table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_closings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub closed_at: DateTimeUtc,
    pub business_date: Date,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub cash_income: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub card_income: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub transfer_income: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_income: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_expenses: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub net: Decimal,
    pub movement_count: i64,
    pub closed_by: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cash_movements::Entity")]
    CashMovements,
}

impl Related<super::cash_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
