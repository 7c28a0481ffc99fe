//! Daily and monthly closing repository.
//!
//! Daily closing freezes "everything not yet closed". The snapshot is the pending
//! set read inside the transaction; the `closing_id` link is written only to rows
//! of that snapshot that are still unclaimed, and a short count means another
//! closing got there first, so the whole closing rolls back as a conflict.
//!
//! Monthly closing re-evaluates its gate inside the transaction that inserts the
//! period row; the unique index on `(month, year)` backs that up.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use serde::Serialize;
use torque_core::closing::{
    ClosingError, DailyClosingService, DailyTotals, GateFacts, GateReason, GateState, MonthlyGate,
};
use torque_core::{AuditAction, Capability};
use torque_shared::clock::month_bounds;
use torque_shared::types::{DailyClosingId, MonthlyClosingId, StaffId};
use torque_shared::{AppError, ErrorKind, ShopCalendar};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::MonthlyClosingStatus;
use crate::entities::{cash_movements, daily_closings, monthly_closings};
use crate::repositories::audit;
use crate::repositories::ledger::{movement_line, pending_movements};
use crate::repositories::settings;
use crate::repositories::staff::{StaffError, require_capability};
use crate::repositories::tx::{begin_write, store_error_kind, store_error_reason};

/// Error types for closing operations.
#[derive(Debug, thiserror::Error)]
pub enum ClosingRepoError {
    /// A closing rule rejected the operation.
    #[error(transparent)]
    Closing(#[from] ClosingError),

    /// Daily closing not found.
    #[error("Daily closing not found: {0}")]
    NotFound(DailyClosingId),

    /// The actor may not close.
    #[error(transparent)]
    Access(#[from] StaffError),

    /// Another closing claimed part of the snapshot.
    #[error("Pending movements were closed concurrently, retry the operation")]
    Conflict,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ClosingRepoError {
    /// Taxonomy bucket.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Closing(e) => e.kind(),
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Access(e) => e.kind(),
            Self::Conflict => ErrorKind::Conflict,
            Self::Database(e) => store_error_kind(e),
        }
    }

    /// Stable reason code.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Closing(e) => e.reason(),
            Self::NotFound(_) => "DAILY_CLOSING_NOT_FOUND",
            Self::Access(e) => e.reason(),
            Self::Conflict => "CONCURRENT_CLOSING",
            Self::Database(e) => store_error_reason(e),
        }
    }
}

impl From<ClosingRepoError> for AppError {
    fn from(e: ClosingRepoError) -> Self {
        Self::new(e.kind(), e.reason(), e.to_string())
    }
}

/// What a daily closing would freeze right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPreview {
    /// Cash income.
    pub cash: Decimal,
    /// Card income.
    pub card: Decimal,
    /// Transfer income.
    pub transfer: Decimal,
    /// All income.
    pub total_income: Decimal,
    /// All expenses.
    pub total_expenses: Decimal,
    /// Income minus expenses.
    pub net_pending: Decimal,
    /// Pending movements.
    pub pending_count: u64,
}

impl From<DailyTotals> for DailyPreview {
    fn from(t: DailyTotals) -> Self {
        Self {
            cash: t.cash,
            card: t.card,
            transfer: t.transfer,
            total_income: t.total_income,
            total_expenses: t.total_expenses,
            net_pending: t.net,
            pending_count: t.movement_count,
        }
    }
}

/// A daily closing with the movements it froze.
#[derive(Debug, Clone, Serialize)]
pub struct DailyClosingDetail {
    /// The closing.
    #[serde(flatten)]
    pub closing: daily_closings::Model,
    /// Its movements.
    pub movements: Vec<cash_movements::Model>,
}

/// Monthly gate as shown to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyStatusView {
    /// BLOCKED, AVAILABLE or CLOSED.
    pub state: GateState,
    /// Reason code.
    pub reason: GateReason,
    /// Human-readable explanation.
    pub message: &'static str,
    /// Current month.
    pub month: u32,
    /// Current year.
    pub year: i32,
    /// Cutoff day in effect this month.
    pub cutoff_day: u32,
    /// Sum of daily closing nets in the month, computed on read.
    pub period_net: Decimal,
}

/// A committed monthly closing.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyClosingOutcome {
    /// Confirmation text.
    pub mensaje: String,
    /// The period row.
    pub monthly_closing: monthly_closings::Model,
}

/// Movement ids bound per claim statement, well under every backend's
/// bind-parameter limit.
const CLAIM_CHUNK: usize = 500;

/// Closing repository.
#[derive(Debug, Clone)]
pub struct ClosingRepository {
    db: DatabaseConnection,
    calendar: ShopCalendar,
    default_cutoff_day: u32,
}

impl ClosingRepository {
    /// Creates a new closing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, calendar: ShopCalendar, default_cutoff_day: u32) -> Self {
        Self {
            db,
            calendar,
            default_cutoff_day,
        }
    }

    /// Aggregates the pending movements without touching them.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn preview_daily(&self) -> Result<DailyPreview, ClosingRepoError> {
        let pending = pending_movements(&self.db).await?;
        let lines: Vec<_> = pending.iter().map(movement_line).collect();
        Ok(DailyTotals::aggregate(&lines).into())
    }

    /// Freezes the pending movements into a new daily closing.
    ///
    /// # Errors
    ///
    /// Returns `NothingToClose`, `Forbidden`, `Conflict` or a database error.
    pub async fn run_daily(&self, actor: StaffId) -> Result<daily_closings::Model, ClosingRepoError> {
        let txn = begin_write(&self.db).await?;
        require_capability(&txn, actor, Capability::CloseDaily).await?;

        let snapshot = pending_movements(&txn).await?;
        let closing = self.freeze(&txn, &snapshot, actor).await?;

        txn.commit().await?;
        Ok(closing)
    }

    /// Writes the closing row for `snapshot` and links exactly those movements.
    ///
    /// A movement of the snapshot that is no longer pending means another
    /// closing took it; the caller's transaction must then be dropped.
    async fn freeze(
        &self,
        txn: &DatabaseTransaction,
        snapshot: &[cash_movements::Model],
        actor: StaffId,
    ) -> Result<daily_closings::Model, ClosingRepoError> {
        let lines: Vec<_> = snapshot.iter().map(movement_line).collect();
        let totals = DailyClosingService::plan(&lines)?;

        // 1. Closing row.
        let now = self.calendar.now();
        let closing_id = DailyClosingId::new();
        let closing = daily_closings::ActiveModel {
            id: Set(closing_id.into_inner()),
            closed_at: Set(now),
            business_date: Set(self.calendar.local_date(now)),
            cash_income: Set(totals.cash),
            card_income: Set(totals.card),
            transfer_income: Set(totals.transfer),
            total_income: Set(totals.total_income),
            total_expenses: Set(totals.total_expenses),
            net: Set(totals.net),
            #[allow(clippy::cast_possible_wrap)]
            movement_count: Set(totals.movement_count as i64),
            closed_by: Set(actor.into_inner()),
        }
        .insert(txn)
        .await?;

        // 2. Claim exactly the snapshot, a bounded number of ids per statement.
        let ids: Vec<Uuid> = snapshot.iter().map(|m| m.id).collect();
        let mut claimed = 0_u64;
        for chunk in ids.chunks(CLAIM_CHUNK) {
            let result = cash_movements::Entity::update_many()
                .col_expr(
                    cash_movements::Column::ClosingId,
                    Expr::value(Some(closing_id.into_inner())),
                )
                .filter(cash_movements::Column::Id.is_in(chunk.iter().copied()))
                .filter(cash_movements::Column::ClosingId.is_null())
                .exec(txn)
                .await?;
            claimed += result.rows_affected;
        }

        if claimed != ids.len() as u64 {
            tracing::warn!(
                expected = ids.len(),
                claimed,
                "Daily closing snapshot was claimed concurrently"
            );
            return Err(ClosingRepoError::Conflict);
        }

        // 3. Audit.
        audit::record(
            txn,
            actor,
            AuditAction::DailyClosing,
            DailyClosingService::summary(&closing_id.to_string(), &totals),
            now,
        )
        .await?;

        Ok(closing)
    }

    /// Loads a daily closing and the movements linked to it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn get_daily_closing(
        &self,
        id: DailyClosingId,
    ) -> Result<DailyClosingDetail, ClosingRepoError> {
        let closing = daily_closings::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ClosingRepoError::NotFound(id))?;

        let movements = cash_movements::Entity::find()
            .filter(cash_movements::Column::ClosingId.eq(closing.id))
            .order_by_asc(cash_movements::Column::CreatedAt)
            .order_by_asc(cash_movements::Column::Id)
            .all(&self.db)
            .await?;

        Ok(DailyClosingDetail { closing, movements })
    }

    /// Evaluates the monthly gate for the current shop-local month.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn monthly_status(&self) -> Result<MonthlyStatusView, ClosingRepoError> {
        let today = self.calendar.today();
        let facts = gate_facts(&self.db, today, self.default_cutoff_day).await?;
        let status = MonthlyGate::evaluate(&facts);

        Ok(MonthlyStatusView {
            state: status.state,
            reason: status.reason,
            message: status.reason.message(),
            month: today.month(),
            year: today.year(),
            cutoff_day: MonthlyGate::effective_cutoff(facts.cutoff_day, today),
            period_net: period_net(&self.db, today).await?,
        })
    }

    /// Closes the current month.
    ///
    /// # Errors
    ///
    /// Returns `NotAvailable` with the gate reason, `Forbidden` or a database error.
    pub async fn run_monthly(
        &self,
        actor: StaffId,
    ) -> Result<MonthlyClosingOutcome, ClosingRepoError> {
        let txn = begin_write(&self.db).await?;
        require_capability(&txn, actor, Capability::CloseMonthly).await?;

        let now = self.calendar.now();
        let today = self.calendar.local_date(now);
        let facts = gate_facts(&txn, today, self.default_cutoff_day).await?;
        MonthlyGate::ensure_available(&facts)?;

        let month = today.month();
        let year = today.year();
        let monthly_closing = monthly_closings::ActiveModel {
            id: Set(MonthlyClosingId::new().into_inner()),
            #[allow(clippy::cast_possible_wrap)]
            month: Set(month as i32),
            year: Set(year),
            executed_at: Set(now),
            closed_by: Set(actor.into_inner()),
            status: Set(MonthlyClosingStatus::Closed),
        }
        .insert(&txn)
        .await
        .map_err(period_insert_error)?;

        let mensaje = MonthlyGate::summary(month, year);
        audit::record(&txn, actor, AuditAction::MonthlyClosing, mensaje.clone(), now).await?;

        txn.commit().await?;
        Ok(MonthlyClosingOutcome {
            mensaje,
            monthly_closing,
        })
    }
}

/// A second row for the same `(month, year)` means another closing won.
fn period_insert_error(e: DbErr) -> ClosingRepoError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        ClosingError::NotAvailable(GateReason::AlreadyClosed).into()
    } else {
        e.into()
    }
}

/// Reads the gate inputs on `conn`.
async fn gate_facts<C: ConnectionTrait>(
    conn: &C,
    today: NaiveDate,
    default_cutoff_day: u32,
) -> Result<GateFacts, DbErr> {
    let cutoff_day = settings::cutoff_day(conn, default_cutoff_day).await?;

    #[allow(clippy::cast_possible_wrap)]
    let month = today.month() as i32;
    let already_closed = monthly_closings::Entity::find()
        .filter(monthly_closings::Column::Month.eq(month))
        .filter(monthly_closings::Column::Year.eq(today.year()))
        .count(conn)
        .await?
        > 0;

    let daily_closing_today = daily_closings::Entity::find()
        .filter(daily_closings::Column::BusinessDate.eq(today))
        .count(conn)
        .await?
        > 0;

    Ok(GateFacts {
        today,
        cutoff_day,
        already_closed,
        daily_closing_today,
    })
}

/// Sum of daily closing nets whose business date falls in `today`'s month.
async fn period_net<C: ConnectionTrait>(conn: &C, today: NaiveDate) -> Result<Decimal, DbErr> {
    let (first, last) = month_bounds(today);
    let closings = daily_closings::Entity::find()
        .filter(daily_closings::Column::BusinessDate.between(first, last))
        .all(conn)
        .await?;

    Ok(closings.iter().map(|c| c.net.round_dp(2)).sum())
}

#[cfg(test)]
#[path = "closing_tests.rs"]
mod tests;
