//! Audit trail repository.
//!
//! Entries are appended through [`record`] on the caller's open transaction, so an
//! audit row exists exactly when the operation it describes committed.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder,
    QuerySelect, Set,
};
use torque_core::AuditAction;
use torque_shared::types::{AuditEntryId, StaffId};

use crate::entities::audit_entries;

/// Default page size for [`AuditRepository::list`].
pub const DEFAULT_AUDIT_LIMIT: u64 = 50;

/// Upper bound for [`AuditRepository::list`].
pub const MAX_AUDIT_LIMIT: u64 = 500;

/// Appends an audit entry on `conn`.
///
/// # Errors
///
/// Returns an error if the insert fails; the enclosing transaction must then be
/// abandoned.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    actor: StaffId,
    action: AuditAction,
    detail: impl Into<String>,
    at: DateTime<Utc>,
) -> Result<audit_entries::Model, DbErr> {
    audit_entries::ActiveModel {
        id: Set(AuditEntryId::new().into_inner()),
        actor_id: Set(actor.into_inner()),
        action: Set(action.as_str().to_string()),
        detail: Set(detail.into()),
        created_at: Set(at),
    }
    .insert(conn)
    .await
}

/// Read side of the audit trail.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Latest entries first, capped at [`MAX_AUDIT_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, limit: Option<u64>) -> Result<Vec<audit_entries::Model>, DbErr> {
        let limit = limit.unwrap_or(DEFAULT_AUDIT_LIMIT).clamp(1, MAX_AUDIT_LIMIT);

        audit_entries::Entity::find()
            .order_by_desc(audit_entries::Column::CreatedAt)
            .order_by_desc(audit_entries::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
    }
}
