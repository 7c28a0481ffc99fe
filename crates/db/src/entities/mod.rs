//! `SeaORM` entity definitions.

pub mod audit_entries;
pub mod cash_movements;
pub mod daily_closings;
pub mod monthly_closings;
pub mod orders;
pub mod sea_orm_active_enums;
pub mod settings;
pub mod staff;
