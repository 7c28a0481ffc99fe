//! Torque API Server
//!
//! Main entry point for the repair-shop backend.

use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use torque_api::{AppState, create_router};
use torque_db::connect_with;
use torque_db::migration::Migrator;
use torque_shared::{AppConfig, LogFormat, ShopCalendar};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "torque=debug,torque_api=debug,torque_db=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(config.logging.format);

    let db = connect_with(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    if config.database.run_migrations {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    let calendar = ShopCalendar::system(config.shop.timezone);
    info!(
        timezone = %config.shop.timezone,
        folio_prefix = %config.shop.folio_prefix,
        default_cutoff_day = config.shop.default_cutoff_day,
        "Shop calendar configured"
    );

    let state = AppState::new(db, calendar, config.shop.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
