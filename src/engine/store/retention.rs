// Retention sweep.
// No background timer — the handler calls this once per inbound event, so
// purge cadence is exactly "as often as messages arrive".

use super::{RecordStore, DATE_FMT};
use crate::atoms::error::TrackerResult;
use chrono::NaiveDate;
use log::info;
use rusqlite::params;

impl RecordStore {
    /// Delete read and message records whose record_date is strictly before
    /// `cutoff`. Idempotent. Returns (reads removed, messages removed).
    pub fn purge_older_than(&self, cutoff: NaiveDate) -> TrackerResult<(usize, usize)> {
        let conn = self.conn.lock();
        let cutoff_s = cutoff.format(DATE_FMT).to_string();

        let reads = conn.execute(
            "DELETE FROM read_records WHERE record_date < ?1",
            params![cutoff_s],
        )?;
        let messages = conn.execute(
            "DELETE FROM message_records WHERE record_date < ?1",
            params![cutoff_s],
        )?;

        if reads > 0 || messages > 0 {
            info!(
                "[store] Purged {} read record(s) and {} message(s) older than {}",
                reads, messages, cutoff_s
            );
        }
        Ok((reads, messages))
    }
}
