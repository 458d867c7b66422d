pub mod migrations;
pub mod models;
pub mod queries;
pub mod tx;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use anyhow::Result;
use reviewer_types::ReviewError;
use rusqlite::{Connection, OpenFlags};
use tracing::info;

pub use tx::{Isolation, Tx};

const READER_POOL_SIZE: usize = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite store with a single writer connection and a small pool of
/// read-only connections.
///
/// All access goes through [`Database::read`] and [`Database::write`], which
/// run a unit of work inside one transaction.
pub struct Database {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    reader_idx: AtomicUsize,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_busy_timeout(path, BUSY_TIMEOUT)
    }

    /// Like [`Database::open`], with `busy_timeout` bounding how long a
    /// connection waits on another process's lock before failing with
    /// [`ReviewError::Conflict`].
    pub fn open_with_busy_timeout(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let writer = Connection::open(path)?;

        // WAL mode for concurrent reads
        writer.pragma_update(None, "journal_mode", "WAL")?;
        writer.pragma_update(None, "foreign_keys", "ON")?;
        writer.busy_timeout(busy_timeout)?;

        migrations::run(&writer)?;

        let mut readers = Vec::with_capacity(READER_POOL_SIZE);
        for _ in 0..READER_POOL_SIZE {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            conn.busy_timeout(busy_timeout)?;
            readers.push(Mutex::new(conn));
        }

        info!(
            "Database opened at {} (1 writer + {} readers)",
            path.display(),
            READER_POOL_SIZE
        );
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            reader_idx: AtomicUsize::new(0),
        })
    }

    /// In-memory database. Reads share the writer connection since a private
    /// in-memory database cannot be opened twice.
    pub fn open_in_memory() -> Result<Self> {
        let writer = Connection::open_in_memory()?;
        writer.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&writer)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            reader_idx: AtomicUsize::new(0),
        })
    }

    fn writer(&self) -> Result<MutexGuard<'_, Connection>, ReviewError> {
        self.writer
            .lock()
            .map_err(|e| ReviewError::internal("lock writer connection", anyhow::anyhow!("{e}")))
    }

    fn reader(&self) -> Result<MutexGuard<'_, Connection>, ReviewError> {
        if self.readers.is_empty() {
            return self.writer();
        }

        let idx = self.reader_idx.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        self.readers[idx]
            .lock()
            .map_err(|e| ReviewError::internal("lock reader connection", anyhow::anyhow!("{e}")))
    }
}
