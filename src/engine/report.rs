// Readtrack Engine — Report Builder
//
// Renders read/unread summaries from the record store and the roster
// snapshot. Ordering is deliberately stable: roster-derived lists follow
// roster iteration order, store-derived lists follow the store's query order
// (date DESC, time ASC). Unread is only computed for a single-group scope —
// cross-group unread is ill-defined without per-group rosters.

use crate::atoms::error::TrackerResult;
use crate::atoms::types::{ReadRecord, PRIVATE_GROUP};
use crate::engine::roster::Roster;
use crate::engine::store::{RecordStore, DATE_FMT};
use chrono::NaiveDate;
use std::fmt::Write as _;

/// What a report covers: one group, or every group the store has seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportScope {
    Group(String),
    AllGroups,
}

/// Display cap for each list in the unread report.
const LIST_CAP: usize = 10;

// ── Read report ────────────────────────────────────────────────────────────

/// Read summary over `[from, to]`, grouped by day, newest first.
pub fn build_read_report(
    store: &RecordStore,
    roster: &Roster,
    scope: &ReportScope,
    from: NaiveDate,
    to: NaiveDate,
) -> TrackerResult<String> {
    let (records, scope_label) = match scope {
        ReportScope::Group(gid) => (
            store.query_read(Some(gid), from, to)?,
            store.resolve_group_display_name(gid),
        ),
        ReportScope::AllGroups => (store.query_read(None, from, to)?, "all groups".to_string()),
    };

    let from_s = from.format(DATE_FMT).to_string();
    let to_s = to.format(DATE_FMT).to_string();

    if records.is_empty() {
        return Ok(format!(
            "No read records for {} between {} and {}.",
            scope_label, from_s, to_s
        ));
    }

    // Partition into days, preserving the store's (date DESC, time ASC) order.
    let mut days: Vec<(String, Vec<&ReadRecord>)> = Vec::new();
    for record in &records {
        match days.last_mut() {
            Some((date, list)) if *date == record.record_date => list.push(record),
            _ => days.push((record.record_date.clone(), vec![record])),
        }
    }

    let mut out = format!("Read status ({} to {})\n\n", from_s, to_s);
    let cross_group = matches!(scope, ReportScope::AllGroups);

    for (date, list) in &days {
        if *date == to_s {
            let _ = writeln!(out, "Today ({}):", date);
            for (i, record) in list.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", i + 1, render_entry(record, roster, store, cross_group));
            }
            if cross_group || roster.is_empty() {
                // Unread needs a roster and a single group; otherwise only
                // the total is meaningful.
                let _ = writeln!(out, "Read today: {}\n", list.len());
            } else {
                let unread = roster
                    .names()
                    .filter(|name| !list.iter().any(|r| r.member_name == *name))
                    .count();
                let _ = writeln!(out, "Read today: {}, unread: {}\n", list.len(), unread);
            }
        }
    }

    let history: Vec<&(String, Vec<&ReadRecord>)> =
        days.iter().filter(|(date, _)| *date != to_s).collect();
    if !history.is_empty() {
        out.push_str("History:\n");
        for (date, list) in history {
            let _ = writeln!(out, "{} — {} read", date, list.len());
            for (i, record) in list.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, render_entry(record, roster, store, cross_group));
            }
        }
    }

    Ok(out.trim_end().to_string())
}

fn render_entry(record: &ReadRecord, roster: &Roster, store: &RecordStore, with_group: bool) -> String {
    let mut line = record.member_name.clone();
    if !roster.contains(&record.member_name) {
        line.push_str(" (not on roster)");
    }
    if with_group && record.group_id != PRIVATE_GROUP {
        let _ = write!(line, " [{}]", store.resolve_group_display_name(&record.group_id));
    }
    let _ = write!(line, " ({})", record.read_time);
    line
}

// ── Unread report ──────────────────────────────────────────────────────────

/// Unread summary for `today`: per group, the three-way partition of
/// on-roster read / off-roster read / unread names, each list capped.
pub fn build_unread_report(
    store: &RecordStore,
    roster: &Roster,
    scope: &ReportScope,
    today: NaiveDate,
) -> TrackerResult<String> {
    if roster.is_empty() {
        return Ok("The roster is empty or failed to load — unread members cannot be computed.".to_string());
    }

    let today_s = today.format(DATE_FMT).to_string();

    match scope {
        ReportScope::Group(gid) => {
            let readers = store.query_read_for_day(gid, today)?;
            let label = store.resolve_group_display_name(gid);
            let section = unread_section(&readers, roster);

            if section.unread.is_empty() {
                return Ok(format!(
                    "Everyone on the roster has read in {} today ({}).",
                    label, today_s
                ));
            }
            let mut out = format!("Unread summary ({})\n\n", today_s);
            section.render(&mut out, roster);
            Ok(out.trim_end().to_string())
        }
        ReportScope::AllGroups => {
            let groups = store.active_groups_for_day(today)?;
            if groups.is_empty() {
                return Ok(format!("No group has any read record today ({}).", today_s));
            }

            let mut out = format!("Unread summary ({})\n\n", today_s);
            for gid in groups {
                let readers = store.query_read_for_day(&gid, today)?;
                let label = store.resolve_group_display_name(&gid);
                let _ = writeln!(out, "[Group: {}]", label);
                unread_section(&readers, roster).render(&mut out, roster);
                out.push('\n');
            }
            Ok(out.trim_end().to_string())
        }
    }
}

struct UnreadSection {
    on_roster: Vec<String>,
    off_roster: Vec<String>,
    unread: Vec<String>,
}

fn unread_section(readers: &[String], roster: &Roster) -> UnreadSection {
    // Readers keep store order; unread keeps roster order.
    let (on_roster, off_roster): (Vec<String>, Vec<String>) =
        readers.iter().cloned().partition(|name| roster.contains(name));
    let unread: Vec<String> = roster
        .names()
        .filter(|name| !readers.iter().any(|r| r == name))
        .map(|name| name.to_string())
        .collect();
    UnreadSection { on_roster, off_roster, unread }
}

impl UnreadSection {
    fn render(&self, out: &mut String, roster: &Roster) {
        let _ = writeln!(out, "On-roster read: {}", self.on_roster.len());
        let _ = writeln!(out, "Off-roster read: {}", self.off_roster.len());
        let _ = writeln!(out, "Unread: {}", self.unread.len());

        if !self.on_roster.is_empty() {
            out.push_str("Read (on roster):\n");
            render_capped(out, &self.on_roster, |name| {
                format!("{} (id: {})", name, roster.id_of(name).unwrap_or(""))
            });
        }
        if !self.off_roster.is_empty() {
            out.push_str("Read (not on roster):\n");
            render_capped(out, &self.off_roster, |name| name.to_string());
        }
        if !self.unread.is_empty() {
            out.push_str("Unread members:\n");
            render_capped(out, &self.unread, |name| {
                format!("{} (id: {})", name, roster.id_of(name).unwrap_or(""))
            });
        }
    }
}

fn render_capped(out: &mut String, names: &[String], render: impl Fn(&str) -> String) {
    for (i, name) in names.iter().take(LIST_CAP).enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, render(name));
    }
    if names.len() > LIST_CAP {
        let _ = writeln!(out, "  …and {} more", names.len() - LIST_CAP);
    }
}
