//! Cash ledger repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use torque_core::ledger::{ExpenseRequest, LedgerError, LedgerService, MovementLine};
use torque_core::{AuditAction, Capability};
use torque_shared::types::{MovementId, StaffId};
use torque_shared::{AppError, ErrorKind, ShopCalendar};

use crate::entities::cash_movements;
use crate::entities::sea_orm_active_enums::{MovementDirection, PaymentMethod};
use crate::repositories::audit;
use crate::repositories::staff::{StaffError, require_capability};
use crate::repositories::tx::{begin_write, store_error_kind, store_error_reason};

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerRepoError {
    /// The movement failed validation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The actor may not record expenses.
    #[error(transparent)]
    Access(#[from] StaffError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl LedgerRepoError {
    /// Taxonomy bucket.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ledger(e) => e.kind(),
            Self::Access(e) => e.kind(),
            Self::Database(e) => store_error_kind(e),
        }
    }

    /// Stable reason code.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Ledger(e) => e.reason(),
            Self::Access(e) => e.reason(),
            Self::Database(e) => store_error_reason(e),
        }
    }
}

impl From<LedgerRepoError> for AppError {
    fn from(e: LedgerRepoError) -> Self {
        Self::new(e.kind(), e.reason(), e.to_string())
    }
}

/// Movements not yet consumed by a daily closing, oldest first.
pub(crate) async fn pending_movements<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<cash_movements::Model>, DbErr> {
    cash_movements::Entity::find()
        .filter(cash_movements::Column::ClosingId.is_null())
        .order_by_asc(cash_movements::Column::CreatedAt)
        .order_by_asc(cash_movements::Column::Id)
        .all(conn)
        .await
}

/// Projects a persisted movement onto what aggregation needs.
///
/// Amounts are re-scaled to cents since some backends hand decimals back through
/// a binary float.
pub(crate) fn movement_line(model: &cash_movements::Model) -> MovementLine {
    MovementLine::new(
        model.direction.into(),
        model.amount.round_dp(2),
        model.payment_method.into(),
    )
}

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
    calendar: ShopCalendar,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, calendar: ShopCalendar) -> Self {
        Self { db, calendar }
    }

    /// Appends an expense and its audit entry.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `Forbidden`, or a database error.
    pub async fn record_expense(
        &self,
        request: ExpenseRequest,
        actor: StaffId,
    ) -> Result<cash_movements::Model, LedgerRepoError> {
        let expense = LedgerService::validate_expense(&request)?;

        let txn = begin_write(&self.db).await?;
        require_capability(&txn, actor, Capability::RecordExpense).await?;

        let now = self.calendar.now();
        let movement = cash_movements::ActiveModel {
            id: Set(MovementId::new().into_inner()),
            direction: Set(MovementDirection::Expense),
            amount: Set(expense.amount.amount()),
            payment_method: Set(PaymentMethod::from(expense.method)),
            reference: Set(expense.reference.clone()),
            description: Set(expense.description.clone()),
            order_id: Set(None),
            closing_id: Set(None),
            created_by: Set(actor.into_inner()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        audit::record(
            &txn,
            actor,
            AuditAction::ExpenseRecorded,
            format!(
                "Expense {} via {}: {}",
                expense.amount, expense.method, expense.description
            ),
            now,
        )
        .await?;

        txn.commit().await?;
        Ok(movement)
    }

    /// Movements not yet closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn pending(&self) -> Result<Vec<cash_movements::Model>, DbErr> {
        pending_movements(&self.db).await
    }
}
