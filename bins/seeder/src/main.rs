//! Development data seeder for Torque.
//!
//! Creates the staff roster, sets the monthly cutoff day and opens a demo order.
//!
//! Usage: cargo run --bin seeder

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use torque_core::order::IntakeRequest;
use torque_core::{Capability, CapabilitySet};
use torque_db::migration::Migrator;
use torque_db::{MONTHLY_CUTOFF_DAY_KEY, OrderRepository, SettingsRepository, StaffRepository};
use torque_shared::types::StaffId;
use torque_shared::{AppConfig, ShopCalendar};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let calendar = ShopCalendar::system(config.shop.timezone);

    println!("Connecting to database...");
    let db = torque_db::connect_with(&config.database).await?;
    Migrator::up(&db, None).await?;

    println!("Seeding staff...");
    let admin = seed_staff(&db, &calendar).await?;

    println!("Seeding settings...");
    SettingsRepository::new(db.clone())
        .set(
            MONTHLY_CUTOFF_DAY_KEY,
            &config.shop.default_cutoff_day.to_string(),
            calendar.now(),
        )
        .await?;

    println!("Seeding demo order...");
    let order = OrderRepository::new(db.clone(), calendar, config.shop.folio_prefix.clone())
        .open_order(
            IntakeRequest {
                client_id: Some(1),
                vehicle_id: Some(1),
                odometer_km: 120_450,
                fuel_level: 50,
                technician: Some("Luis".to_string()),
            },
            admin,
        )
        .await?;
    println!("  order {} ({})", order.id, order.folio.unwrap_or_default());

    println!("Seeding complete!");
    println!("  admin actor_id: {}", admin.into_inner());
    Ok(())
}

async fn seed_staff(db: &DatabaseConnection, calendar: &ShopCalendar) -> anyhow::Result<StaffId> {
    let staff = StaffRepository::new(db.clone());
    let now = calendar.now();

    let admin = staff
        .create("Administrador", &CapabilitySet::new([Capability::Admin]), now)
        .await?;

    let roster = [
        ("Recepcion", vec![Capability::ManageOrders]),
        (
            "Caja",
            vec![
                Capability::Charge,
                Capability::RecordExpense,
                Capability::CloseDaily,
            ],
        ),
        ("Gerencia", vec![Capability::CloseMonthly, Capability::CloseDaily]),
    ];
    for (name, caps) in roster {
        let member = staff.create(name, &CapabilitySet::new(caps), now).await?;
        println!("  {name}: {}", member.id);
    }

    Ok(StaffId::from_uuid(admin.id))
}
