//! Initial database migration.
//!
//! Creates the order, ledger, closing and audit tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: ORDERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::Folio).string_len(32).null().unique_key())
                    .col(ColumnDef::new(Orders::ClientId).big_integer().null())
                    .col(ColumnDef::new(Orders::VehicleId).big_integer().null())
                    .col(ColumnDef::new(Orders::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Orders::Technician).string_len(120).null())
                    .col(ColumnDef::new(Orders::OdometerKm).integer().not_null())
                    .col(ColumnDef::new(Orders::FuelLevel).small_integer().not_null())
                    .col(ColumnDef::new(Orders::AmountCharged).decimal_len(14, 2).null())
                    .col(ColumnDef::new(Orders::PaymentMethod).string_len(16).null())
                    .col(ColumnDef::new(Orders::ClosedAt).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: DAILY CLOSINGS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(DailyClosings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DailyClosings::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(DailyClosings::ClosedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DailyClosings::BusinessDate).date().not_null())
                    .col(money(DailyClosings::CashIncome))
                    .col(money(DailyClosings::CardIncome))
                    .col(money(DailyClosings::TransferIncome))
                    .col(money(DailyClosings::TotalIncome))
                    .col(money(DailyClosings::TotalExpenses))
                    .col(money(DailyClosings::Net))
                    .col(ColumnDef::new(DailyClosings::MovementCount).big_integer().not_null())
                    .col(ColumnDef::new(DailyClosings::ClosedBy).uuid().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_daily_closings_business_date")
                    .table(DailyClosings::Table)
                    .col(DailyClosings::BusinessDate)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: CASH MOVEMENTS (the ledger)
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(CashMovements::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CashMovements::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CashMovements::Direction).string_len(16).not_null())
                    .col(money(CashMovements::Amount))
                    .col(ColumnDef::new(CashMovements::PaymentMethod).string_len(16).not_null())
                    .col(ColumnDef::new(CashMovements::Reference).string_len(120).null())
                    .col(ColumnDef::new(CashMovements::Description).text().not_null())
                    .col(ColumnDef::new(CashMovements::OrderId).integer().null())
                    .col(ColumnDef::new(CashMovements::ClosingId).uuid().null())
                    .col(ColumnDef::new(CashMovements::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(CashMovements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cash_movements_order")
                            .from(CashMovements::Table, CashMovements::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cash_movements_closing")
                            .from(CashMovements::Table, CashMovements::ClosingId)
                            .to(DailyClosings::Table, DailyClosings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Pending-set lookups filter on closing_id IS NULL.
        manager
            .create_index(
                Index::create()
                    .name("idx_cash_movements_closing")
                    .table(CashMovements::Table)
                    .col(CashMovements::ClosingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cash_movements_order")
                    .table(CashMovements::Table)
                    .col(CashMovements::OrderId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 4: MONTHLY CLOSINGS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(MonthlyClosings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MonthlyClosings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MonthlyClosings::Month).integer().not_null())
                    .col(ColumnDef::new(MonthlyClosings::Year).integer().not_null())
                    .col(
                        ColumnDef::new(MonthlyClosings::ExecutedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MonthlyClosings::ClosedBy).uuid().not_null())
                    .col(ColumnDef::new(MonthlyClosings::Status).string_len(16).not_null())
                    .to_owned(),
            )
            .await?;

        // At most one monthly closing per period.
        manager
            .create_index(
                Index::create()
                    .name("uq_monthly_closings_period")
                    .table(MonthlyClosings::Table)
                    .col(MonthlyClosings::Month)
                    .col(MonthlyClosings::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 5: AUDIT TRAIL
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(AuditEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditEntries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AuditEntries::ActorId).uuid().not_null())
                    .col(ColumnDef::new(AuditEntries::Action).string_len(32).not_null())
                    .col(ColumnDef::new(AuditEntries::Detail).text().not_null())
                    .col(
                        ColumnDef::new(AuditEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_entries_created")
                    .table(AuditEntries::Table)
                    .col(AuditEntries::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditEntries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthlyClosings::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CashMovements::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DailyClosings::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

fn money<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column).decimal_len(14, 2).not_null().to_owned()
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    Folio,
    ClientId,
    VehicleId,
    Status,
    Technician,
    OdometerKm,
    FuelLevel,
    AmountCharged,
    PaymentMethod,
    ClosedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DailyClosings {
    Table,
    Id,
    ClosedAt,
    BusinessDate,
    CashIncome,
    CardIncome,
    TransferIncome,
    TotalIncome,
    TotalExpenses,
    Net,
    MovementCount,
    ClosedBy,
}

#[derive(DeriveIden)]
enum CashMovements {
    Table,
    Id,
    Direction,
    Amount,
    PaymentMethod,
    Reference,
    Description,
    OrderId,
    ClosingId,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MonthlyClosings {
    Table,
    Id,
    Month,
    Year,
    ExecutedAt,
    ClosedBy,
    Status,
}

#[derive(DeriveIden)]
enum AuditEntries {
    Table,
    Id,
    ActorId,
    Action,
    Detail,
    CreatedAt,
}
