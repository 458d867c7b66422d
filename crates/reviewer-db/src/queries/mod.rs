//! Repository access layer. Every operation is a method on [`crate::Tx`] and
//! translates SQLite failures into [`ReviewError`] before returning.

mod pull_requests;
mod teams;
mod users;

use reviewer_types::ReviewError;
use rusqlite::{ErrorCode, ffi};

/// Map a rusqlite error raised during `context` into the error taxonomy.
/// Lock contention becomes a retryable conflict, everything else is internal.
pub(crate) fn store_error(context: &'static str) -> impl FnOnce(rusqlite::Error) -> ReviewError {
    move |err| match err.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
            ReviewError::Conflict { context }
        }
        _ => ReviewError::internal(context, err),
    }
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
