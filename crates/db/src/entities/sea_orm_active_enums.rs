//! `SeaORM` active enums, stored as short strings so the schema stays portable.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use torque_core::ledger as domain_ledger;
use torque_core::order as domain_order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "received")]
    Received,
    #[sea_orm(string_value = "diagnosing")]
    Diagnosing,
    #[sea_orm(string_value = "repairing")]
    Repairing,
    #[sea_orm(string_value = "finished")]
    Finished,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<domain_order::OrderStatus> for OrderStatus {
    fn from(value: domain_order::OrderStatus) -> Self {
        match value {
            domain_order::OrderStatus::Received => Self::Received,
            domain_order::OrderStatus::Diagnosing => Self::Diagnosing,
            domain_order::OrderStatus::Repairing => Self::Repairing,
            domain_order::OrderStatus::Finished => Self::Finished,
            domain_order::OrderStatus::Delivered => Self::Delivered,
            domain_order::OrderStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<OrderStatus> for domain_order::OrderStatus {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Received => Self::Received,
            OrderStatus::Diagnosing => Self::Diagnosing,
            OrderStatus::Repairing => Self::Repairing,
            OrderStatus::Finished => Self::Finished,
            OrderStatus::Delivered => Self::Delivered,
            OrderStatus::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<domain_ledger::MovementDirection> for MovementDirection {
    fn from(value: domain_ledger::MovementDirection) -> Self {
        match value {
            domain_ledger::MovementDirection::Income => Self::Income,
            domain_ledger::MovementDirection::Expense => Self::Expense,
        }
    }
}

impl From<MovementDirection> for domain_ledger::MovementDirection {
    fn from(value: MovementDirection) -> Self {
        match value {
            MovementDirection::Income => Self::Income,
            MovementDirection::Expense => Self::Expense,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

impl From<domain_ledger::PaymentMethod> for PaymentMethod {
    fn from(value: domain_ledger::PaymentMethod) -> Self {
        match value {
            domain_ledger::PaymentMethod::Cash => Self::Cash,
            domain_ledger::PaymentMethod::Card => Self::Card,
            domain_ledger::PaymentMethod::Transfer => Self::Transfer,
        }
    }
}

impl From<PaymentMethod> for domain_ledger::PaymentMethod {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::Card => Self::Card,
            PaymentMethod::Transfer => Self::Transfer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum MonthlyClosingStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
}
