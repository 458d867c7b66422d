//! Reviewer assignment service.
//!
//! Each public operation validates its input, then runs one unit of work
//! through the store's transaction coordinator. Concurrent conflicting
//! requests are ordered by the store's write transactions, not by locks
//! held here.

pub mod pull_requests;
pub mod teams;
pub mod users;
pub mod validation;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reviewer_db::Database;

pub use reviewer_types::ReviewError;

pub type Clock = fn() -> DateTime<Utc>;

pub struct Service {
    db: Arc<Database>,
    clock: Clock,
}

impl Service {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            clock: Utc::now,
        }
    }

    /// Replace the time source used for creation and merge timestamps.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}
