//! Schema migration runner for Torque.
//!
//! Reads `DATABASE_URL` and accepts the usual sea-orm-migration subcommands:
//!   migrator up | down | status | fresh | refresh | reset

use sea_orm_migration::prelude::*;
use torque_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
