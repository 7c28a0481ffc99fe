//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Each mutating method owns exactly one database transaction, opened with
//! [`tx::begin_write`].

pub mod audit;
pub mod billing;
pub mod closing;
pub mod ledger;
pub mod order;
pub mod settings;
pub mod staff;
pub mod tx;

pub use audit::AuditRepository;
pub use billing::{BillingRepoError, BillingRepository};
pub use closing::{
    ClosingRepoError, ClosingRepository, DailyClosingDetail, DailyPreview, MonthlyClosingOutcome,
    MonthlyStatusView,
};
pub use ledger::{LedgerRepoError, LedgerRepository};
pub use order::{OrderRepoError, OrderRepository};
pub use settings::{MONTHLY_CUTOFF_DAY_KEY, SettingsRepository};
pub use staff::{StaffError, StaffRepository};
