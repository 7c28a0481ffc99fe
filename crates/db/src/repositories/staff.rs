//! Staff repository and capability checks.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Set,
};
use torque_core::{Capability, CapabilitySet};
use torque_shared::types::StaffId;
use torque_shared::{AppError, ErrorKind};

use crate::entities::staff;
use crate::repositories::tx::{store_error_kind, store_error_reason};

/// Error types for actor checks.
#[derive(Debug, thiserror::Error)]
pub enum StaffError {
    /// No staff member with this id.
    #[error("Unknown actor: {0}")]
    UnknownActor(StaffId),

    /// The staff member was deactivated.
    #[error("Actor {0} is inactive")]
    Inactive(StaffId),

    /// The staff member lacks the capability.
    #[error("Actor {actor} lacks the '{capability}' capability")]
    MissingCapability {
        /// Actor.
        actor: StaffId,
        /// Required capability.
        capability: Capability,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StaffError {
    /// Taxonomy bucket.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Database(e) => store_error_kind(e),
            _ => ErrorKind::Forbidden,
        }
    }

    /// Stable reason code.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnknownActor(_) => "UNKNOWN_ACTOR",
            Self::Inactive(_) => "INACTIVE_ACTOR",
            Self::MissingCapability { .. } => "MISSING_CAPABILITY",
            Self::Database(e) => store_error_reason(e),
        }
    }
}

impl From<StaffError> for AppError {
    fn from(e: StaffError) -> Self {
        Self::new(e.kind(), e.reason(), e.to_string())
    }
}

/// Capabilities stored on a staff row.
///
/// Unreadable JSON grants nothing.
#[must_use]
pub fn capabilities_of(member: &staff::Model) -> CapabilitySet {
    match serde_json::from_str::<Vec<String>>(&member.capabilities) {
        Ok(tags) => CapabilitySet::from_tags(tags.iter().map(String::as_str)),
        Err(e) => {
            tracing::warn!(actor = %member.id, error = %e, "Malformed capability list");
            CapabilitySet::default()
        }
    }
}

/// Loads `actor` on `conn` and checks it may use `capability`.
///
/// # Errors
///
/// Returns `UnknownActor`, `Inactive` or `MissingCapability`, or a database error.
pub async fn require_capability<C: ConnectionTrait>(
    conn: &C,
    actor: StaffId,
    capability: Capability,
) -> Result<staff::Model, StaffError> {
    let member = staff::Entity::find_by_id(actor.into_inner())
        .one(conn)
        .await?
        .ok_or(StaffError::UnknownActor(actor))?;

    if !member.active {
        return Err(StaffError::Inactive(actor));
    }

    if !capabilities_of(&member).allows(capability) {
        return Err(StaffError::MissingCapability { actor, capability });
    }

    Ok(member)
}

/// Staff repository.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    db: DatabaseConnection,
}

impl StaffRepository {
    /// Creates a new staff repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        capabilities: &CapabilitySet,
        at: DateTime<Utc>,
    ) -> Result<staff::Model, DbErr> {
        let tags = serde_json::to_string(&capabilities.tags())
            .map_err(|e| DbErr::Custom(e.to_string()))?;

        staff::ActiveModel {
            id: Set(StaffId::new().into_inner()),
            name: Set(name.trim().to_string()),
            capabilities: Set(tags),
            active: Set(true),
            created_at: Set(at),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, id: StaffId) -> Result<Option<staff::Model>, DbErr> {
        staff::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Marks a staff member inactive; returns false if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn deactivate(&self, id: StaffId) -> Result<bool, DbErr> {
        let Some(member) = self.find(id).await? else {
            return Ok(false);
        };
        let mut active: staff::ActiveModel = member.into();
        active.active = Set(false);
        active.update(&self.db).await?;
        Ok(true)
    }
}
