//! Shared fixtures for database integration tests.
//!
//! Every test gets its own SQLite database migrated with the real migrator,
//! a settable clock and an administrator. Most tests run on a single
//! in-memory connection; the concurrency tests use a file behind a pool.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;
use torque_core::billing::ChargeRequest;
use torque_core::ledger::{ExpenseRequest, PaymentMethod};
use torque_core::order::IntakeRequest;
use torque_core::{Capability, CapabilitySet};
use torque_db::entities::{audit_entries, cash_movements, orders};
use torque_db::migration::Migrator;
use torque_db::{
    AuditRepository, BillingRepository, ClosingRepository, LedgerRepository, OrderRepository,
    SettingsRepository, StaffRepository,
};
use torque_shared::types::{OrderId, StaffId};
use torque_shared::{FixedClock, ShopCalendar};
use uuid::Uuid;

pub const FOLIO_PREFIX: &str = "OS";
pub const DEFAULT_CUTOFF: u32 = 28;
pub const POOL_SIZE: u32 = 8;

/// Noon in Mexico City on 2026-03-10.
pub fn default_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap()
}

/// Noon in Mexico City on the given March 2026 day.
pub fn march_noon(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, 18, 0, 0).unwrap()
}

pub struct TestShop {
    pub db: DatabaseConnection,
    pub clock: Arc<FixedClock>,
    pub calendar: ShopCalendar,
    pub admin: StaffId,
    pub orders: OrderRepository,
    pub billing: BillingRepository,
    pub ledger: LedgerRepository,
    pub closings: ClosingRepository,
    pub audit: AuditRepository,
    pub settings: SettingsRepository,
    pub staff: StaffRepository,
    _dir: Option<TempDir>,
}

pub async fn setup() -> TestShop {
    setup_at(default_now()).await
}

pub async fn setup_at(now: DateTime<Utc>) -> TestShop {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    build(db, now, None).await
}

/// A shop on a SQLite file behind a multi-connection pool, so concurrent
/// operations really overlap.
pub async fn setup_pooled_at(now: DateTime<Utc>) -> TestShop {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("torque.db").display());
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(POOL_SIZE)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite file");
    build(db, now, Some(dir)).await
}

async fn build(db: DatabaseConnection, now: DateTime<Utc>, dir: Option<TempDir>) -> TestShop {
    Migrator::up(&db, None).await.expect("migrate");

    let clock = Arc::new(FixedClock::new(now));
    let calendar = ShopCalendar::new(clock.clone(), chrono_tz::America::Mexico_City);

    let staff = StaffRepository::new(db.clone());
    let admin = staff
        .create("Admin", &CapabilitySet::new([Capability::Admin]), now)
        .await
        .expect("create admin");

    TestShop {
        orders: OrderRepository::new(db.clone(), calendar.clone(), FOLIO_PREFIX),
        billing: BillingRepository::new(db.clone(), calendar.clone()),
        ledger: LedgerRepository::new(db.clone(), calendar.clone()),
        closings: ClosingRepository::new(db.clone(), calendar.clone(), DEFAULT_CUTOFF),
        audit: AuditRepository::new(db.clone()),
        settings: SettingsRepository::new(db.clone()),
        staff,
        admin: StaffId::from_uuid(admin.id),
        db,
        clock,
        calendar,
        _dir: dir,
    }
}

impl TestShop {
    pub async fn staff_with(&self, name: &str, caps: &[Capability]) -> StaffId {
        let member = self
            .staff
            .create(name, &CapabilitySet::new(caps.iter().copied()), self.clock_now())
            .await
            .expect("create staff");
        StaffId::from_uuid(member.id)
    }

    pub fn clock_now(&self) -> DateTime<Utc> {
        use torque_shared::Clock;
        self.clock.now()
    }

    pub async fn open_order(&self) -> orders::Model {
        self.orders
            .open_order(
                IntakeRequest {
                    client_id: Some(1),
                    vehicle_id: Some(1),
                    odometer_km: 85_000,
                    fuel_level: 40,
                    technician: None,
                },
                self.admin,
            )
            .await
            .expect("open order")
    }

    pub async fn charged_order(&self, amount: Decimal, method: PaymentMethod) -> orders::Model {
        let order = self.open_order().await;
        self.billing
            .charge(OrderId(order.id), charge(amount, method), self.admin)
            .await
            .expect("charge order")
    }

    pub async fn expense(&self, amount: Decimal, description: &str) -> cash_movements::Model {
        self.ledger
            .record_expense(
                ExpenseRequest {
                    amount,
                    method: PaymentMethod::Cash,
                    description: description.to_string(),
                    reference: None,
                },
                self.admin,
            )
            .await
            .expect("record expense")
    }

    pub async fn movement_count(&self) -> u64 {
        cash_movements::Entity::find().count(&self.db).await.unwrap()
    }

    pub async fn audit_actions(&self) -> Vec<String> {
        audit_entries::Entity::find()
            .all(&self.db)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.action)
            .collect()
    }

    pub async fn movements_of_closing(&self, closing_id: Uuid) -> Vec<cash_movements::Model> {
        use sea_orm::{ColumnTrait, QueryFilter};
        cash_movements::Entity::find()
            .filter(cash_movements::Column::ClosingId.eq(closing_id))
            .all(&self.db)
            .await
            .unwrap()
    }
}

/// Charge request without reference (card/transfer get a dummy one).
pub fn charge(amount: Decimal, method: PaymentMethod) -> ChargeRequest {
    ChargeRequest {
        amount,
        method,
        reference: method.requires_reference().then(|| "REF-0001".to_string()),
    }
}
