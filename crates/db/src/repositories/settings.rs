//! Runtime business settings (key-value).

use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use torque_core::closing::CutoffDay;

use crate::entities::settings;

/// Key of the monthly cutoff day.
pub const MONTHLY_CUTOFF_DAY_KEY: &str = "monthly_cutoff_day";

/// Reads the monthly cutoff day on `conn`, falling back to `default`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn cutoff_day<C: ConnectionTrait>(conn: &C, default: u32) -> Result<u32, DbErr> {
    let stored = settings::Entity::find_by_id(MONTHLY_CUTOFF_DAY_KEY.to_string())
        .one(conn)
        .await?;

    let cutoff = CutoffDay::from_setting(stored.as_ref().map(|s| s.value.as_str()), default);
    if cutoff.malformed {
        tracing::warn!(
            key = MONTHLY_CUTOFF_DAY_KEY,
            value = stored.as_ref().map_or("", |s| s.value.as_str()),
            fallback = cutoff.day,
            "Ignoring malformed cutoff day setting"
        );
    }
    Ok(cutoff.day)
}

/// Settings repository.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: DatabaseConnection,
}

impl SettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads a raw value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, key: &str) -> Result<Option<String>, DbErr> {
        Ok(settings::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?
            .map(|s| s.value))
    }

    /// Inserts or replaces a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub async fn set(&self, key: &str, value: &str, at: DateTime<Utc>) -> Result<(), DbErr> {
        let model = settings::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(at),
        };

        settings::Entity::insert(model)
            .on_conflict(
                OnConflict::column(settings::Column::Key)
                    .update_columns([settings::Column::Value, settings::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
