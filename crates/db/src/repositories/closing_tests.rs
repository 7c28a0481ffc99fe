//! Snapshot and period-row tests that need to interleave with a closing.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ConnectOptions, Database, PaginatorTrait};
use sea_orm_migration::MigratorTrait;
use torque_core::billing::ChargeRequest;
use torque_core::ledger::{ExpenseRequest, PaymentMethod};
use torque_core::order::IntakeRequest;
use torque_core::{Capability, CapabilitySet};
use torque_shared::types::OrderId;
use torque_shared::FixedClock;

use super::*;
use crate::migration::Migrator;
use crate::repositories::{BillingRepository, LedgerRepository, OrderRepository, StaffRepository};

struct Fixture {
    db: DatabaseConnection,
    calendar: ShopCalendar,
    admin: StaffId,
    closings: ClosingRepository,
}

async fn fixture() -> Fixture {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let now = Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap();
    let calendar = ShopCalendar::new(
        Arc::new(FixedClock::new(now)),
        chrono_tz::America::Mexico_City,
    );
    let admin = StaffRepository::new(db.clone())
        .create("Admin", &CapabilitySet::new([Capability::Admin]), now)
        .await
        .unwrap();

    Fixture {
        closings: ClosingRepository::new(db.clone(), calendar.clone(), 28),
        admin: StaffId::from_uuid(admin.id),
        db,
        calendar,
    }
}

impl Fixture {
    async fn charged_order(&self, amount: Decimal) {
        let order = OrderRepository::new(self.db.clone(), self.calendar.clone(), "OS")
            .open_order(IntakeRequest::default(), self.admin)
            .await
            .unwrap();
        BillingRepository::new(self.db.clone(), self.calendar.clone())
            .charge(
                OrderId(order.id),
                ChargeRequest {
                    amount,
                    method: PaymentMethod::Cash,
                    reference: None,
                },
                self.admin,
            )
            .await
            .unwrap();
    }

    async fn daily_closing_count(&self) -> u64 {
        daily_closings::Entity::find().count(&self.db).await.unwrap()
    }
}

#[tokio::test]
async fn test_movement_committed_after_snapshot_waits_for_next_closing() {
    let f = fixture().await;
    f.charged_order(dec!(100)).await;

    // Snapshot first, then a charge commits before the claim.
    let snapshot = pending_movements(&f.db).await.unwrap();
    assert_eq!(snapshot.len(), 1);
    f.charged_order(dec!(250)).await;

    let txn = begin_write(&f.db).await.unwrap();
    let closing = f.closings.freeze(&txn, &snapshot, f.admin).await.unwrap();
    txn.commit().await.unwrap();

    assert_eq!(closing.movement_count, 1);
    assert_eq!(closing.net.round_dp(2), dec!(100));

    let pending = pending_movements(&f.db).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert!(pending[0].closing_id.is_none());
    assert_eq!(pending[0].amount.round_dp(2), dec!(250));

    let next = f.closings.run_daily(f.admin).await.unwrap();
    assert_eq!(next.movement_count, 1);
    assert_eq!(next.net.round_dp(2), dec!(250));
    assert!(pending_movements(&f.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_snapshot_taken_by_another_closing_is_a_conflict() {
    let f = fixture().await;
    f.charged_order(dec!(100)).await;

    let snapshot = pending_movements(&f.db).await.unwrap();
    f.closings.run_daily(f.admin).await.unwrap();

    let txn = begin_write(&f.db).await.unwrap();
    let err = f.closings.freeze(&txn, &snapshot, f.admin).await.unwrap_err();
    txn.rollback().await.unwrap();

    assert!(matches!(err, ClosingRepoError::Conflict));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.reason(), "CONCURRENT_CLOSING");
    // The losing closing row went away with its transaction.
    assert_eq!(f.daily_closing_count().await, 1);
}

#[tokio::test]
async fn test_large_backlog_is_claimed_in_chunks() {
    let f = fixture().await;
    let ledger = LedgerRepository::new(f.db.clone(), f.calendar.clone());
    let backlog = CLAIM_CHUNK + 37;
    for _ in 0..backlog {
        ledger
            .record_expense(
                ExpenseRequest {
                    amount: dec!(1.50),
                    method: PaymentMethod::Cash,
                    description: "Shop rags".to_string(),
                    reference: None,
                },
                f.admin,
            )
            .await
            .unwrap();
    }

    let closing = f.closings.run_daily(f.admin).await.unwrap();

    assert_eq!(closing.movement_count, i64::try_from(backlog).unwrap());
    assert!(pending_movements(&f.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_period_row_reports_already_closed() {
    let f = fixture().await;
    let row = |id: Uuid| monthly_closings::ActiveModel {
        id: Set(id),
        month: Set(3),
        year: Set(2026),
        executed_at: Set(f.calendar.now()),
        closed_by: Set(f.admin.into_inner()),
        status: Set(MonthlyClosingStatus::Closed),
    };

    row(Uuid::now_v7()).insert(&f.db).await.unwrap();
    let err = row(Uuid::now_v7()).insert(&f.db).await.unwrap_err();
    let mapped = period_insert_error(err);

    assert!(matches!(
        mapped,
        ClosingRepoError::Closing(ClosingError::NotAvailable(GateReason::AlreadyClosed))
    ));
    assert_eq!(mapped.reason(), "ALREADY_CLOSED");
}

#[test]
fn test_other_insert_errors_stay_database_errors() {
    let mapped = period_insert_error(DbErr::Custom("disk I/O error".to_string()));
    assert!(matches!(mapped, ClosingRepoError::Database(_)));
    assert_eq!(mapped.kind(), ErrorKind::Infrastructure);
}
