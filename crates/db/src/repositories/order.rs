//! Order repository: intake, technician assignment and status transitions.
//!
//! Every mutating method runs in one transaction: actor check, read, rule,
//! conditional write, audit append, commit.

use chrono::Datelike;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set,
};
use torque_core::order::{
    IntakeRequest, OrderError, OrderLifecycle, OrderStatus, format_folio, normalize_technician,
};
use torque_core::{AuditAction, Capability};
use torque_shared::types::{OrderId, StaffId};
use torque_shared::{AppError, ErrorKind, ShopCalendar};

use crate::entities::{orders, sea_orm_active_enums::OrderStatus as DbOrderStatus};
use crate::repositories::audit;
use crate::repositories::staff::{StaffError, require_capability};
use crate::repositories::tx::{begin_write, store_error_kind, store_error_reason};

/// Error types for order operations.
#[derive(Debug, thiserror::Error)]
pub enum OrderRepoError {
    /// Order not found.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// A lifecycle rule rejected the operation.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The actor may not perform the operation.
    #[error(transparent)]
    Access(#[from] StaffError),

    /// The order changed between read and write.
    #[error("Order {0} was modified concurrently, retry the operation")]
    Conflict(OrderId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl OrderRepoError {
    /// Taxonomy bucket.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Order(e) => e.kind(),
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
            Self::Order(e) => e.reason(),
            Self::Access(e) => e.reason(),
            Self::Conflict(_) => "CONCURRENT_MODIFICATION",
            Self::Database(e) => store_error_reason(e),
        }
    }
}

impl From<OrderRepoError> for AppError {
    fn from(e: OrderRepoError) -> Self {
        Self::new(e.kind(), e.reason(), e.to_string())
    }
}

/// Loads an order on `conn`.
pub(crate) async fn find_order<C: ConnectionTrait>(
    conn: &C,
    id: OrderId,
) -> Result<Option<orders::Model>, DbErr> {
    orders::Entity::find_by_id(id.0).one(conn).await
}

/// Order repository.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: DatabaseConnection,
    calendar: ShopCalendar,
    folio_prefix: String,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, calendar: ShopCalendar, folio_prefix: impl Into<String>) -> Self {
        Self {
            db,
            calendar,
            folio_prefix: folio_prefix.into(),
        }
    }

    /// Opens an order in `received` and assigns its folio.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the intake snapshot is invalid
    /// - the actor lacks `manage_orders`
    /// - a database operation fails
    pub async fn open_order(
        &self,
        input: IntakeRequest,
        actor: StaffId,
    ) -> Result<orders::Model, OrderRepoError> {
        OrderLifecycle::validate_intake(&input)?;

        let txn = begin_write(&self.db).await?;
        require_capability(&txn, actor, Capability::ManageOrders).await?;

        let now = self.calendar.now();
        let inserted = orders::ActiveModel {
            folio: Set(None),
            client_id: Set(input.client_id),
            vehicle_id: Set(input.vehicle_id),
            status: Set(DbOrderStatus::Received),
            technician: Set(normalize_technician(input.technician.as_deref())),
            odometer_km: Set(input.odometer_km),
            fuel_level: Set(input.fuel_level),
            amount_charged: Set(None),
            payment_method: Set(None),
            closed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let folio = format_folio(
            &self.folio_prefix,
            self.calendar.local_date(now).year(),
            inserted.id,
        );
        let mut active: orders::ActiveModel = inserted.into();
        active.folio = Set(Some(folio.clone()));
        let order = active.update(&txn).await?;

        audit::record(
            &txn,
            actor,
            AuditAction::OrderCreated,
            format!("Order {folio} opened"),
            now,
        )
        .await?;

        txn.commit().await?;
        Ok(order)
    }

    /// Finds an order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn get(&self, id: OrderId) -> Result<orders::Model, OrderRepoError> {
        find_order(&self.db, id)
            .await?
            .ok_or(OrderRepoError::NotFound(id))
    }

    /// Sets or clears the technician of a non-terminal order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `AlreadyTerminal`, `Forbidden`, `Conflict` or a database error.
    pub async fn assign_technician(
        &self,
        id: OrderId,
        technician: Option<&str>,
        actor: StaffId,
    ) -> Result<orders::Model, OrderRepoError> {
        let txn = begin_write(&self.db).await?;
        require_capability(&txn, actor, Capability::ManageOrders).await?;

        let order = find_order(&txn, id)
            .await?
            .ok_or(OrderRepoError::NotFound(id))?;
        OrderLifecycle::ensure_mutable(order.status.into())?;

        let technician = normalize_technician(technician);
        let now = self.calendar.now();

        let result = orders::Entity::update_many()
            .col_expr(orders::Column::Technician, Expr::value(technician.clone()))
            .col_expr(orders::Column::UpdatedAt, Expr::value(now))
            .filter(orders::Column::Id.eq(id.0))
            .filter(orders::Column::Status.eq(order.status))
            .exec(&txn)
            .await?;
        if result.rows_affected != 1 {
            return Err(OrderRepoError::Conflict(id));
        }

        let detail = match &technician {
            Some(name) => format!("Order {}: technician {name} assigned", folio_of(&order)),
            None => format!("Order {}: technician cleared", folio_of(&order)),
        };
        audit::record(&txn, actor, AuditAction::TechnicianAssigned, detail, now).await?;

        let updated = find_order(&txn, id)
            .await?
            .ok_or(OrderRepoError::NotFound(id))?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Operator-driven status change.
    ///
    /// The write is conditional on the status read at the start of the
    /// transaction; a concurrent change surfaces as `Conflict`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidTarget`, `MissingTechnician`, `AlreadyTerminal`,
    /// `Forbidden`, `Conflict` or a database error.
    pub async fn transition(
        &self,
        id: OrderId,
        target: &str,
        actor: StaffId,
    ) -> Result<orders::Model, OrderRepoError> {
        let txn = begin_write(&self.db).await?;
        require_capability(&txn, actor, Capability::ManageOrders).await?;

        let order = find_order(&txn, id)
            .await?
            .ok_or(OrderRepoError::NotFound(id))?;

        let previous: OrderStatus = order.status.into();
        let mut status = previous;
        let next = OrderLifecycle::transition(&mut status, order.technician.as_deref(), target)?;

        let now = self.calendar.now();
        let result = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(DbOrderStatus::from(next)))
            .col_expr(orders::Column::UpdatedAt, Expr::value(now))
            .filter(orders::Column::Id.eq(id.0))
            .filter(orders::Column::Status.eq(order.status))
            .exec(&txn)
            .await?;
        if result.rows_affected != 1 {
            return Err(OrderRepoError::Conflict(id));
        }

        audit::record(
            &txn,
            actor,
            AuditAction::OrderStatusChanged,
            format!("Order {}: {previous} -> {next}", folio_of(&order)),
            now,
        )
        .await?;

        let updated = find_order(&txn, id)
            .await?
            .ok_or(OrderRepoError::NotFound(id))?;
        txn.commit().await?;
        Ok(updated)
    }
}

/// Folio for messages; falls back to the numeric id.
pub(crate) fn folio_of(order: &orders::Model) -> String {
    order
        .folio
        .clone()
        .unwrap_or_else(|| format!("#{}", order.id))
}
