//! Write transactions and store-error classification.
//!
//! SQLite only upgrades a read lock to a write lock if no other writer got
//! there first, and it fails that upgrade immediately instead of waiting on the
//! busy timeout. Mutating operations therefore open with a write so the lock is
//! taken (or waited for) before the transaction reads anything.

use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction, DbErr,
    TransactionTrait,
};
use torque_shared::ErrorKind;

/// Matches no rows but still takes SQLite's RESERVED lock.
const SQLITE_TAKE_WRITE_LOCK: &str = "UPDATE settings SET key = key WHERE 0 = 1";

/// Begins a transaction that holds the write lock from its first statement.
///
/// On PostgreSQL this is a plain `BEGIN`; row locks taken by the conditional
/// writes serialize contenders there.
///
/// # Errors
///
/// Returns an error if the transaction cannot be started or the lock is not
/// granted within the busy timeout.
pub async fn begin_write(db: &DatabaseConnection) -> Result<DatabaseTransaction, DbErr> {
    let txn = db.begin().await?;
    if txn.get_database_backend() == DatabaseBackend::Sqlite {
        txn.execute_unprepared(SQLITE_TAKE_WRITE_LOCK).await?;
    }
    Ok(txn)
}

/// Whether the store refused the statement because of a competing writer.
///
/// Covers SQLite's `SQLITE_BUSY`/`SQLITE_LOCKED` and PostgreSQL's
/// serialization failures and deadlocks; all of them are safe to retry.
#[must_use]
pub fn is_lock_contention(err: &DbErr) -> bool {
    let text = err.to_string();
    [
        "database is locked",
        "database table is locked",
        "(code: 5)",
        "(code: 6)",
        "could not serialize access",
        "deadlock detected",
    ]
    .iter()
    .any(|needle| text.contains(needle))
}

/// Taxonomy bucket of a bare store error.
pub(crate) fn store_error_kind(err: &DbErr) -> ErrorKind {
    if is_lock_contention(err) {
        ErrorKind::Conflict
    } else {
        ErrorKind::Infrastructure
    }
}

/// Reason code of a bare store error.
pub(crate) fn store_error_reason(err: &DbErr) -> &'static str {
    if is_lock_contention(err) {
        "CONCURRENT_MODIFICATION"
    } else {
        "DATABASE_ERROR"
    }
}
