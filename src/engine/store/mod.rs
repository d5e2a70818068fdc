// Readtrack Engine — Record Store
// Persists read records and the raw message log in SQLite via rusqlite.
//
// Module layout:
//   reads      — read-record upsert + queries (per-day, per-range, counts)
//   messages   — append-only message log + group-name recovery
//   retention  — purge of rows past the retention horizon
//   schema     — idempotent migrations, run once at open
//
// Every operation is a short-lived statement on a single shared connection;
// the Mutex is held only for the duration of one call. The hosting runtime
// is single-threaded per event, but nothing here breaks if it ever is not:
// the read upsert is a single atomic INSERT … ON CONFLICT.

use crate::atoms::error::TrackerResult;
use log::info;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

mod messages;
mod reads;
mod retention;
mod schema;

pub const DATE_FMT: &str = "%Y-%m-%d";
pub const TIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Thread-safe database wrapper.
pub struct RecordStore {
    /// The SQLite connection, protected by a Mutex.
    pub(crate) conn: Mutex<Connection>,
}

impl RecordStore {
    /// Open (or create) the database at `path` and initialize tables.
    pub fn open(path: &Path) -> TrackerResult<Self> {
        info!("[store] Opening record store at {:?}", path);
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;").ok();
        schema::run_migrations(&conn)?;
        Ok(RecordStore { conn: Mutex::new(conn) })
    }

    /// In-memory store with the full schema. Used by tests.
    pub fn open_in_memory() -> TrackerResult<Self> {
        let conn = Connection::open_in_memory()?;
        schema::run_migrations(&conn)?;
        Ok(RecordStore { conn: Mutex::new(conn) })
    }
}
