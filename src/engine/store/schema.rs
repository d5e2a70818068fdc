// Database schema for the readtrack record store.
// Called once at open time by RecordStore::open()/open_in_memory().
// Adding a new table or column: append an idempotent CREATE TABLE IF NOT
// EXISTS or ALTER TABLE … ADD COLUMN at the end of run_migrations() — never
// modify existing SQL, to keep upgrade paths clean.

use crate::atoms::error::TrackerResult;
use rusqlite::Connection;

pub(crate) fn run_migrations(conn: &Connection) -> TrackerResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS read_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id TEXT NOT NULL,
            member_name TEXT NOT NULL,
            read_time TEXT NOT NULL,
            record_date TEXT NOT NULL,
            UNIQUE(group_id, member_name, record_date)
        );

        CREATE INDEX IF NOT EXISTS idx_read_records_day
            ON read_records(group_id, record_date);

        CREATE TABLE IF NOT EXISTS message_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            sent_at TEXT NOT NULL,
            record_date TEXT NOT NULL,
            group_display_name TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_message_records_day
            ON message_records(record_date);

        CREATE INDEX IF NOT EXISTS idx_message_records_group
            ON message_records(group_id, sent_at);
        ",
    )?;
    Ok(())
}
