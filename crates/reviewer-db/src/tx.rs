//! Transaction coordination.
//!
//! Every business operation runs as one unit of work inside one transaction:
//! a closure that receives a [`Tx`] handle. Returning `Ok` commits, returning
//! `Err` rolls back and hands the error back unchanged.
//!
//! SQLite has no per-transaction isolation knob, so the two levels map onto
//! how the transaction is opened:
//!
//! - [`Isolation::RepeatableRead`] opens a DEFERRED transaction on a reader
//!   connection. In WAL mode a read transaction keeps the snapshot taken by
//!   its first statement until it ends.
//! - [`Isolation::Serializable`] opens an IMMEDIATE transaction on the writer
//!   connection. The write lock is taken at BEGIN, so write transactions never
//!   interleave.

use std::ops::Deref;

use reviewer_types::ReviewError;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{debug, warn};

use crate::Database;
use crate::queries::store_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Isolation {
    RepeatableRead,
    Serializable,
}

impl Isolation {
    fn behavior(self) -> TransactionBehavior {
        match self {
            Isolation::RepeatableRead => TransactionBehavior::Deferred,
            Isolation::Serializable => TransactionBehavior::Immediate,
        }
    }
}

/// Transaction-scoped handle. The repository operations live on this type
/// (see [`crate::queries`]), so they can only run inside a unit of work.
pub struct Tx<'conn> {
    inner: Transaction<'conn>,
    isolation: Isolation,
}

impl Tx<'_> {
    pub fn isolation(&self) -> Isolation {
        self.isolation
    }
}

impl Deref for Tx<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.inner
    }
}

impl Database {
    /// Run `unit` in a repeatable-read transaction.
    pub fn read<F, T>(&self, unit: F) -> Result<T, ReviewError>
    where
        F: FnOnce(&Tx<'_>) -> Result<T, ReviewError>,
    {
        self.run(Isolation::RepeatableRead, unit)
    }

    /// Run `unit` in a serializable transaction. Units of work must not nest:
    /// calling `write` from inside a write unit blocks on the writer forever.
    pub fn write<F, T>(&self, unit: F) -> Result<T, ReviewError>
    where
        F: FnOnce(&Tx<'_>) -> Result<T, ReviewError>,
    {
        self.run(Isolation::Serializable, unit)
    }

    fn run<F, T>(&self, isolation: Isolation, unit: F) -> Result<T, ReviewError>
    where
        F: FnOnce(&Tx<'_>) -> Result<T, ReviewError>,
    {
        let mut conn = match isolation {
            Isolation::RepeatableRead => self.reader()?,
            Isolation::Serializable => self.writer()?,
        };

        let inner = conn
            .transaction_with_behavior(isolation.behavior())
            .map_err(store_error("begin transaction"))?;
        let tx = Tx { inner, isolation };

        match unit(&tx) {
            Ok(out) => {
                tx.inner.commit().map_err(store_error("commit transaction"))?;
                Ok(out)
            }
            Err(err) => {
                debug!(?isolation, error = %err, "rolling back transaction");
                if let Err(e) = tx.inner.rollback() {
                    warn!("Rollback failed: {}", e);
                }
                Err(err)
            }
        }
    }
}
