// Message-log CRUD.
// The log is append-only and exists for two reasons: recovering a
// human-readable group name for reports (there is no group-name registry),
// and resolving whitelist-by-name commands via substring search.

use super::{RecordStore, DATE_FMT, TIME_FMT};
use crate::atoms::error::TrackerResult;
use crate::atoms::types::GroupMatch;
use chrono::NaiveDateTime;
use rusqlite::params;

impl RecordStore {
    /// Append one raw message. Pure insert, no dedup.
    pub fn append_message(
        &self,
        group_id: &str,
        content: &str,
        group_display_name: Option<&str>,
        sent_at: NaiveDateTime,
    ) -> TrackerResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO message_records (group_id, content, sent_at, record_date, group_display_name)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                group_id,
                content,
                sent_at.format(TIME_FMT).to_string(),
                sent_at.date().format(DATE_FMT).to_string(),
                group_display_name
            ],
        )?;
        Ok(())
    }

    /// Best-effort human name for a group: the most recent non-null display
    /// name seen in the message log, else the id truncated to 10 chars.
    pub fn resolve_group_display_name(&self, group_id: &str) -> String {
        let conn = self.conn.lock();
        let found: Option<String> = conn
            .query_row(
                "SELECT group_display_name FROM message_records
                 WHERE group_id = ?1 AND group_display_name IS NOT NULL
                 ORDER BY sent_at DESC LIMIT 1",
                params![group_id],
                |row| row.get(0),
            )
            .ok();

        match found {
            Some(name) if !name.is_empty() => name,
            _ => {
                if group_id.chars().count() > 10 {
                    let head: String = group_id.chars().take(10).collect();
                    format!("{}…", head)
                } else {
                    group_id.to_string()
                }
            }
        }
    }

    /// Groups whose stored display name contains `fragment` (case-sensitive),
    /// most-recent-first, deduplicated by group id keeping the newest name.
    pub fn find_groups_by_name_fragment(&self, fragment: &str) -> TrackerResult<Vec<GroupMatch>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT group_id, group_display_name FROM message_records
             WHERE group_display_name IS NOT NULL AND instr(group_display_name, ?1) > 0
             ORDER BY sent_at DESC",
        )?;
        let rows = stmt.query_map(params![fragment], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut matches: Vec<GroupMatch> = Vec::new();
        for row in rows {
            let (group_id, display_name) = row?;
            if !matches.iter().any(|m| m.group_id == group_id) {
                matches.push(GroupMatch { group_id, display_name });
            }
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIME_FMT).unwrap()
    }

    #[test]
    fn resolves_most_recent_display_name() {
        let store = RecordStore::open_in_memory().unwrap();
        store.append_message("g1", "hi", Some("Old Name"), at("2026-03-01 09:00:00")).unwrap();
        store.append_message("g1", "hi", Some("New Name"), at("2026-03-02 09:00:00")).unwrap();
        store.append_message("g1", "hi", None, at("2026-03-02 10:00:00")).unwrap();
        assert_eq!(store.resolve_group_display_name("g1"), "New Name");
    }

    #[test]
    fn falls_back_to_truncated_id() {
        let store = RecordStore::open_in_memory().unwrap();
        assert_eq!(store.resolve_group_display_name("short-id"), "short-id");
        assert_eq!(
            store.resolve_group_display_name("a-very-long-group-identifier"),
            "a-very-lon…"
        );
    }

    #[test]
    fn fragment_search_dedups_and_keeps_newest_name() {
        let store = RecordStore::open_in_memory().unwrap();
        store.append_message("g1", "m", Some("Math Class A"), at("2026-03-01 09:00:00")).unwrap();
        store.append_message("g1", "m", Some("Math Class A (2026)"), at("2026-03-02 09:00:00")).unwrap();
        store.append_message("g2", "m", Some("Math Club"), at("2026-03-01 12:00:00")).unwrap();
        store.append_message("g3", "m", Some("History Class"), at("2026-03-02 12:00:00")).unwrap();

        let matches = store.find_groups_by_name_fragment("Math").unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].group_id, "g1");
        assert_eq!(matches[0].display_name, "Math Class A (2026)");
        assert_eq!(matches[1].group_id, "g2");
    }

    #[test]
    fn fragment_search_is_case_sensitive() {
        let store = RecordStore::open_in_memory().unwrap();
        store.append_message("g1", "m", Some("Math Class"), at("2026-03-01 09:00:00")).unwrap();
        assert!(store.find_groups_by_name_fragment("math").unwrap().is_empty());
        assert_eq!(store.find_groups_by_name_fragment("Math").unwrap().len(), 1);
    }
}
