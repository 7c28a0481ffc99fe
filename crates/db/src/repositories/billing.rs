//! Billing repository.
//!
//! `charge` is the shop's one exactly-once operation. The order row is flipped to
//! `delivered` with a write conditioned on the order still being billable, so of
//! two concurrent charges only one can affect the row; the other re-reads the
//! status inside its own transaction and reports `AlreadyBilled`.

use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use torque_core::billing::{BillingError, BillingService, ChargeRequest};
use torque_core::{AuditAction, Capability};
use torque_shared::types::{MovementId, OrderId, StaffId};
use torque_shared::{AppError, ErrorKind, ShopCalendar};

use crate::entities::sea_orm_active_enums::{
    MovementDirection, OrderStatus as DbOrderStatus, PaymentMethod,
};
use crate::entities::{cash_movements, orders};
use crate::repositories::audit;
use crate::repositories::order::{find_order, folio_of};
use crate::repositories::staff::{StaffError, require_capability};
use crate::repositories::tx::{begin_write, store_error_kind, store_error_reason};

/// Error types for billing operations.
#[derive(Debug, thiserror::Error)]
pub enum BillingRepoError {
    /// Order not found.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// A billing rule rejected the charge.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// The actor may not charge.
    #[error(transparent)]
    Access(#[from] StaffError),

    /// The order changed under the charge for a reason other than billing.
    #[error("Order {0} was modified concurrently, retry the operation")]
    Conflict(OrderId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl BillingRepoError {
    /// Taxonomy bucket.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Billing(e) => e.kind(),
            Self::Access(e) => e.kind(),
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Database(e) => store_error_kind(e),
        }
    }

    /// Stable reason code.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ORDER_NOT_FOUND",
            Self::Billing(e) => e.reason(),
            Self::Access(e) => e.reason(),
            Self::Conflict(_) => "CONCURRENT_MODIFICATION",
            Self::Database(e) => store_error_reason(e),
        }
    }
}

impl From<BillingRepoError> for AppError {
    fn from(e: BillingRepoError) -> Self {
        Self::new(e.kind(), e.reason(), e.to_string())
    }
}

/// Billing repository.
#[derive(Debug, Clone)]
pub struct BillingRepository {
    db: DatabaseConnection,
    calendar: ShopCalendar,
}

impl BillingRepository {
    /// Creates a new billing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, calendar: ShopCalendar) -> Self {
        Self { db, calendar }
    }

    /// Charges an order, appends the income movement and the audit entry.
    ///
    /// All three writes commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the order does not exist
    /// - the order is delivered (`AlreadyBilled`) or cancelled
    /// - the amount or reference is invalid
    /// - the actor lacks `charge`
    /// - a database operation fails
    pub async fn charge(
        &self,
        id: OrderId,
        request: ChargeRequest,
        actor: StaffId,
    ) -> Result<orders::Model, BillingRepoError> {
        let txn = begin_write(&self.db).await?;
        require_capability(&txn, actor, Capability::Charge).await?;

        let order = find_order(&txn, id)
            .await?
            .ok_or(BillingRepoError::NotFound(id))?;
        let folio = folio_of(&order);

        let now = self.calendar.now();
        let action = BillingService::charge(order.status.into(), &folio, &request, now)?;
        let method = PaymentMethod::from(action.method);

        // 1. Order: only a still-billable row is touched.
        let result = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(DbOrderStatus::Delivered))
            .col_expr(orders::Column::AmountCharged, Expr::value(action.amount.amount()))
            .col_expr(orders::Column::PaymentMethod, Expr::value(method))
            .col_expr(orders::Column::ClosedAt, Expr::value(action.closed_at))
            .col_expr(orders::Column::UpdatedAt, Expr::value(now))
            .filter(orders::Column::Id.eq(id.0))
            .filter(
                orders::Column::Status
                    .is_not_in([DbOrderStatus::Delivered, DbOrderStatus::Cancelled]),
            )
            .exec(&txn)
            .await?;

        if result.rows_affected != 1 {
            // Lost the race: report what the winner did.
            let current = find_order(&txn, id)
                .await?
                .ok_or(BillingRepoError::NotFound(id))?;
            return Err(match BillingService::ensure_billable(current.status.into()) {
                Err(e) => e.into(),
                Ok(()) => BillingRepoError::Conflict(id),
            });
        }

        // 2. Ledger.
        cash_movements::ActiveModel {
            id: Set(MovementId::new().into_inner()),
            direction: Set(MovementDirection::Income),
            amount: Set(action.amount.amount()),
            payment_method: Set(method),
            reference: Set(action.reference.clone()),
            description: Set(format!("Payment for order {folio}")),
            order_id: Set(Some(id.0)),
            closing_id: Set(None),
            created_by: Set(actor.into_inner()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        // 3. Audit.
        audit::record(&txn, actor, AuditAction::OrderCharged, action.summary, now).await?;

        let charged = find_order(&txn, id)
            .await?
            .ok_or(BillingRepoError::NotFound(id))?;
        txn.commit().await?;
        Ok(charged)
    }
}
