// Read-record CRUD.
// Uniqueness invariant: at most one row per (group_id, member_name,
// record_date). Repeat acknowledgements the same day only move read_time.

use super::{RecordStore, DATE_FMT, TIME_FMT};
use crate::atoms::error::TrackerResult;
use crate::atoms::types::ReadRecord;
use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use rusqlite::params;

impl RecordStore {
    /// Record that `member_name` acknowledged in `group_id` at `at`.
    /// A repeat on the same day updates the timestamp in place; the
    /// INSERT … ON CONFLICT form makes the existence check atomic.
    pub fn upsert_read(&self, group_id: &str, member_name: &str, at: NaiveDateTime) -> TrackerResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO read_records (group_id, member_name, read_time, record_date)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(group_id, member_name, record_date)
             DO UPDATE SET read_time = excluded.read_time",
            params![
                group_id,
                member_name,
                at.format(TIME_FMT).to_string(),
                at.date().format(DATE_FMT).to_string()
            ],
        )?;
        info!("[store] Recorded read for {} in group {}", member_name, group_id);
        Ok(())
    }

    /// Records in `[from, to]`, one group or all, ordered date DESC then
    /// time ASC — the order reports render in.
    pub fn query_read(
        &self,
        group_id: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TrackerResult<Vec<ReadRecord>> {
        let conn = self.conn.lock();
        let from_s = from.format(DATE_FMT).to_string();
        let to_s = to.format(DATE_FMT).to_string();

        let records = if let Some(gid) = group_id {
            let mut stmt = conn.prepare(
                "SELECT group_id, member_name, read_time, record_date
                 FROM read_records
                 WHERE group_id = ?1 AND record_date BETWEEN ?2 AND ?3
                 ORDER BY record_date DESC, read_time ASC",
            )?;
            let rows = stmt.query_map(params![gid, from_s, to_s], |row| {
                Ok(ReadRecord {
                    group_id: row.get(0)?,
                    member_name: row.get(1)?,
                    read_time: row.get(2)?,
                    record_date: row.get(3)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()?
        } else {
            let mut stmt = conn.prepare(
                "SELECT group_id, member_name, read_time, record_date
                 FROM read_records
                 WHERE record_date BETWEEN ?1 AND ?2
                 ORDER BY record_date DESC, read_time ASC",
            )?;
            let rows = stmt.query_map(params![from_s, to_s], |row| {
                Ok(ReadRecord {
                    group_id: row.get(0)?,
                    member_name: row.get(1)?,
                    read_time: row.get(2)?,
                    record_date: row.get(3)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        Ok(records)
    }

    /// Member names with a record in `group_id` on `date`, in read-time order.
    pub fn query_read_for_day(&self, group_id: &str, date: NaiveDate) -> TrackerResult<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT member_name FROM read_records
             WHERE group_id = ?1 AND record_date = ?2
             ORDER BY read_time ASC",
        )?;
        let rows = stmt.query_map(
            params![group_id, date.format(DATE_FMT).to_string()],
            |row| row.get::<_, String>(0),
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// How many records exist for (group, day). Drives the reset confirmation.
    pub fn count_for_day(&self, group_id: &str, date: NaiveDate) -> TrackerResult<i64> {
        let conn = self.conn.lock();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM read_records WHERE group_id = ?1 AND record_date = ?2",
            params![group_id, date.format(DATE_FMT).to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete all records for (group, day). Returns the number removed.
    pub fn delete_for_day(&self, group_id: &str, date: NaiveDate) -> TrackerResult<usize> {
        let conn = self.conn.lock();
        let deleted = conn.execute(
            "DELETE FROM read_records WHERE group_id = ?1 AND record_date = ?2",
            params![group_id, date.format(DATE_FMT).to_string()],
        )?;
        info!("[store] Deleted {} read record(s) for group {} on {}", deleted, group_id, date);
        Ok(deleted)
    }

    /// Total read-record count across all groups and days.
    pub fn count_read_total(&self) -> TrackerResult<i64> {
        let conn = self.conn.lock();
        let count = conn.query_row("SELECT COUNT(*) FROM read_records", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Distinct non-private group ids with at least one record on `date`.
    /// Used by the all-groups unread report.
    pub fn active_groups_for_day(&self, date: NaiveDate) -> TrackerResult<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT group_id FROM read_records
             WHERE record_date = ?1 AND group_id != ?2
             ORDER BY group_id ASC",
        )?;
        let rows = stmt.query_map(
            params![date.format(DATE_FMT).to_string(), crate::atoms::types::PRIVATE_GROUP],
            |row| row.get::<_, String>(0),
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date, time), TIME_FMT).unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FMT).unwrap()
    }

    #[test]
    fn repeat_acknowledgement_updates_in_place() {
        let store = RecordStore::open_in_memory().unwrap();
        store.upsert_read("g1", "Alice", at("2026-03-02", "09:00:00")).unwrap();
        store.upsert_read("g1", "Alice", at("2026-03-02", "11:30:00")).unwrap();

        let records = store.query_read(Some("g1"), day("2026-03-02"), day("2026-03-02")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].member_name, "Alice");
        assert_eq!(records[0].read_time, "2026-03-02 11:30:00");
    }

    #[test]
    fn same_member_different_day_or_group_is_distinct() {
        let store = RecordStore::open_in_memory().unwrap();
        store.upsert_read("g1", "Alice", at("2026-03-01", "09:00:00")).unwrap();
        store.upsert_read("g1", "Alice", at("2026-03-02", "09:00:00")).unwrap();
        store.upsert_read("g2", "Alice", at("2026-03-02", "09:00:00")).unwrap();
        assert_eq!(store.count_read_total().unwrap(), 3);
    }

    #[test]
    fn query_orders_date_desc_then_time_asc() {
        let store = RecordStore::open_in_memory().unwrap();
        store.upsert_read("g1", "Bob", at("2026-03-02", "10:00:00")).unwrap();
        store.upsert_read("g1", "Alice", at("2026-03-02", "08:00:00")).unwrap();
        store.upsert_read("g1", "Carol", at("2026-03-01", "12:00:00")).unwrap();

        let records = store.query_read(Some("g1"), day("2026-03-01"), day("2026-03-02")).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.member_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn query_without_group_spans_all_groups() {
        let store = RecordStore::open_in_memory().unwrap();
        store.upsert_read("g1", "Alice", at("2026-03-02", "09:00:00")).unwrap();
        store.upsert_read("g2", "Bob", at("2026-03-02", "09:05:00")).unwrap();
        let records = store.query_read(None, day("2026-03-02"), day("2026-03-02")).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn count_and_delete_for_day() {
        let store = RecordStore::open_in_memory().unwrap();
        let d = day("2026-03-02");
        store.upsert_read("g1", "Alice", at("2026-03-02", "09:00:00")).unwrap();
        store.upsert_read("g1", "Bob", at("2026-03-02", "09:01:00")).unwrap();
        store.upsert_read("g1", "Carol", at("2026-03-02", "09:02:00")).unwrap();
        store.upsert_read("g1", "Dan", at("2026-03-01", "09:00:00")).unwrap();

        assert_eq!(store.count_for_day("g1", d).unwrap(), 3);
        assert_eq!(store.delete_for_day("g1", d).unwrap(), 3);
        assert_eq!(store.count_for_day("g1", d).unwrap(), 0);
        // Yesterday's record survives.
        assert_eq!(store.count_read_total().unwrap(), 1);
    }

    #[test]
    fn active_groups_excludes_private() {
        let store = RecordStore::open_in_memory().unwrap();
        let d = day("2026-03-02");
        store.upsert_read("g2", "Alice", at("2026-03-02", "09:00:00")).unwrap();
        store.upsert_read("g1", "Bob", at("2026-03-02", "09:00:00")).unwrap();
        store.upsert_read("private", "Carol", at("2026-03-02", "09:00:00")).unwrap();
        assert_eq!(store.active_groups_for_day(d).unwrap(), vec!["g1", "g2"]);
    }
}
