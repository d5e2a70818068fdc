// Readtrack Engine — Event Pipeline
//
// ReadTracker is the host-facing entry point. The hosting chat-bot runtime
// delivers one inbound event at a time to handle(); the returned outcome
// carries an optional reply plus the "stop further processing" signal for
// command replies. Background recording (message log, read attribution)
// never consumes the event and never surfaces storage failures to chat —
// failures are logged and the write is dropped, so a broken disk degrades to
// "this feature silently stops recording", discoverable via logs.
//
// Pipeline order per event:
//   "this group" whitelist commands → whitelist gate → retention sweep →
//   non-text shortcut | (message log → command dispatch | attribution)

use crate::atoms::error::TrackerResult;
use crate::atoms::types::{HandleOutcome, InboundMessage, PayloadKind, PRIVATE_GROUP};
use crate::engine::attribution;
use crate::engine::commands::{self, Command};
use crate::engine::config::TrackerConfig;
use crate::engine::report::{self, ReportScope};
use crate::engine::roster::Roster;
use crate::engine::store::RecordStore;
use crate::engine::whitelist::Whitelist;
use chrono::{Duration, Local, NaiveDateTime};
use log::{error, info, warn};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};

pub struct ReadTracker {
    store: RecordStore,
    roster: RwLock<Roster>,
    whitelist: Mutex<Whitelist>,
    config: TrackerConfig,
    /// Where whitelist mutations are persisted; None for in-memory tests.
    config_path: Option<PathBuf>,
    roster_path: PathBuf,
}

impl ReadTracker {
    /// Open the tracker rooted at `data_dir`: `config.json`, the roster file
    /// named by the config, and `records.db` all live there. Config and
    /// roster load failures degrade to defaults / empty; only a database
    /// failure is an error.
    pub fn open(data_dir: &Path) -> TrackerResult<Self> {
        let config_path = data_dir.join("config.json");
        let config = TrackerConfig::load(&config_path);

        let roster_path = {
            let p = PathBuf::from(&config.roster_file);
            if p.is_absolute() { p } else { data_dir.join(p) }
        };
        let roster = Roster::load(&roster_path);

        let store = RecordStore::open(&data_dir.join("records.db"))?;
        let whitelist = Whitelist::new(config.whitelist.clone());

        info!(
            "[tracker] Initialized: {} roster member(s), whitelist {} group(s)",
            roster.len(),
            whitelist.len()
        );
        Ok(ReadTracker {
            store,
            roster: RwLock::new(roster),
            whitelist: Mutex::new(whitelist),
            config,
            config_path: Some(config_path),
            roster_path,
        })
    }

    /// Open the tracker in the platform data directory
    /// (e.g. `~/.local/share/readtrack` on Linux).
    pub fn open_default() -> TrackerResult<Self> {
        let dir = crate::engine::config::default_data_dir();
        std::fs::create_dir_all(&dir)?;
        Self::open(&dir)
    }

    /// Assemble a tracker from parts. Used by tests (in-memory store, no
    /// config persistence).
    pub fn from_parts(store: RecordStore, roster: Roster, config: TrackerConfig, roster_path: PathBuf) -> Self {
        let whitelist = Whitelist::new(config.whitelist.clone());
        ReadTracker {
            store,
            roster: RwLock::new(roster),
            whitelist: Mutex::new(whitelist),
            config,
            config_path: None,
            roster_path,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Process one inbound event at the current local time.
    pub fn handle(&self, msg: &InboundMessage) -> HandleOutcome {
        self.handle_at(msg, Local::now().naive_local())
    }

    /// Process one inbound event at an explicit time. The clock is a
    /// parameter so day-boundary behavior is testable.
    pub fn handle_at(&self, msg: &InboundMessage, now: NaiveDateTime) -> HandleOutcome {
        let text = msg.text.trim();

        // "This group" whitelist commands must work even for groups that are
        // not (yet) on the whitelist, so they run before the gate.
        if msg.is_group && msg.payload == PayloadKind::Text {
            match commands::parse_command(text) {
                Some(Command::AddThisGroup) => return self.add_this_group(msg),
                Some(Command::RemoveThisGroup) => return self.remove_this_group(msg),
                _ => {}
            }
        }

        if msg.is_group && !self.whitelist.lock().allows(&msg.group_id) {
            info!("[tracker] Group {} not on whitelist, skipping", msg.group_id);
            return HandleOutcome::ignored();
        }

        // Lazy retention sweep: the only purge cadence is message arrival.
        let cutoff = now.date() - Duration::days(self.config.max_record_days);
        if let Err(e) = self.store.purge_older_than(cutoff) {
            error!("[tracker] Retention sweep failed: {}", e);
        }

        // Non-text payloads bypass text analysis: the reaction itself is
        // evidence of attentiveness, so the sender is marked read.
        if msg.payload != PayloadKind::Text {
            if msg.is_group {
                self.record_message(msg, &msg.payload.placeholder(), now);
                self.record_read(&msg.group_id, &msg.sender_display_name, now);
            }
            return HandleOutcome::ignored();
        }

        if msg.is_group {
            self.record_message(msg, text, now);
        }

        if let Some(command) = commands::parse_command(text) {
            return self.dispatch(command, msg, now);
        }

        // Ordinary chat: maybe an acknowledgement.
        if msg.is_group {
            let roster = self.roster.read();
            if let Some(member) = attribution::attribute(
                text,
                &msg.sender_display_name,
                &roster,
                &self.config.read_keyword,
                self.config.roster_gated,
            ) {
                drop(roster);
                self.record_read(&msg.group_id, &member, now);
            }
        }
        HandleOutcome::ignored()
    }

    // ── Background writes (degrade on failure) ─────────────────────────────

    fn record_message(&self, msg: &InboundMessage, content: &str, now: NaiveDateTime) {
        if let Err(e) = self.store.append_message(
            &msg.group_id,
            content,
            msg.group_display_name.as_deref(),
            now,
        ) {
            error!("[tracker] Message log write failed for group {}: {}", msg.group_id, e);
        }
    }

    fn record_read(&self, group_id: &str, member: &str, now: NaiveDateTime) {
        if let Err(e) = self.store.upsert_read(group_id, member, now) {
            error!("[tracker] Read record write failed for {} in {}: {}", member, group_id, e);
        }
    }

    // ── Command dispatch ───────────────────────────────────────────────────

    fn dispatch(&self, command: Command, msg: &InboundMessage, now: NaiveDateTime) -> HandleOutcome {
        match command {
            Command::QueryReadMembers => self.query_read(msg, now),
            Command::QueryUnreadMembers => self.query_unread(msg, now),
            Command::ResetRecords => self.reset_confirm(msg, now),
            Command::ConfirmReset => self.reset_records(msg, now),
            Command::ShowRoster => self.show_roster(),
            Command::ReloadRoster => self.reload_roster(),
            Command::TestRecord(name) => self.test_record(msg, &name, now),
            Command::ShowWhitelist => self.show_whitelist(),
            Command::AddWhitelist(arg) => self.add_whitelist(msg, &arg),
            Command::RemoveWhitelist(arg) => self.remove_whitelist(msg, &arg),
            Command::ClearWhitelist => self.clear_whitelist(),
            Command::WhitelistHelp => HandleOutcome::reply(commands::whitelist_help_text()),
            Command::Help => HandleOutcome::reply(commands::help_text()),
            // Already handled ahead of the whitelist gate.
            Command::AddThisGroup | Command::RemoveThisGroup => HandleOutcome::ignored(),
        }
    }

    /// The effective group id for record scoping: the real group id in a
    /// group, the "private" sentinel otherwise.
    fn scope_group_id(msg: &InboundMessage) -> &str {
        if msg.is_group { &msg.group_id } else { PRIVATE_GROUP }
    }

    fn report_scope(msg: &InboundMessage) -> ReportScope {
        if msg.is_group {
            ReportScope::Group(msg.group_id.clone())
        } else {
            ReportScope::AllGroups
        }
    }

    fn query_read(&self, msg: &InboundMessage, now: NaiveDateTime) -> HandleOutcome {
        let to = now.date();
        let from = to - Duration::days(self.config.max_record_days - 1);
        let roster = self.roster.read();

        match self.store.count_read_total() {
            Ok(total) => info!("[tracker] Read query over {} total record(s)", total),
            Err(e) => warn!("[tracker] Read-count probe failed: {}", e),
        }

        match report::build_read_report(&self.store, &roster, &Self::report_scope(msg), from, to) {
            Ok(text) => HandleOutcome::reply(text),
            Err(e) => {
                error!("[tracker] Read report failed: {}", e);
                HandleOutcome::reply(format!("Query failed: {}", e))
            }
        }
    }

    fn query_unread(&self, msg: &InboundMessage, now: NaiveDateTime) -> HandleOutcome {
        let roster = self.roster.read();
        match report::build_unread_report(&self.store, &roster, &Self::report_scope(msg), now.date()) {
            Ok(text) => HandleOutcome::reply(text),
            Err(e) => {
                error!("[tracker] Unread report failed: {}", e);
                HandleOutcome::reply(format!("Query failed: {}", e))
            }
        }
    }

    fn reset_confirm(&self, msg: &InboundMessage, now: NaiveDateTime) -> HandleOutcome {
        let today = now.date();
        match self.store.count_for_day(Self::scope_group_id(msg), today) {
            Ok(0) => HandleOutcome::reply(format!(
                "There are no read records for {} — nothing to reset.",
                today
            )),
            Ok(count) => HandleOutcome::reply(format!(
                "Reset today's ({}) read records? This will delete {} record(s).\nReply \"confirm reset\" to proceed.",
                today, count
            )),
            Err(e) => {
                error!("[tracker] Reset count failed: {}", e);
                HandleOutcome::reply(format!("Query failed: {}", e))
            }
        }
    }

    fn reset_records(&self, msg: &InboundMessage, now: NaiveDateTime) -> HandleOutcome {
        let today = now.date();
        match self.store.delete_for_day(Self::scope_group_id(msg), today) {
            Ok(deleted) => HandleOutcome::reply(format!(
                "Reset complete: deleted {} read record(s) for {}.",
                deleted, today
            )),
            Err(e) => {
                error!("[tracker] Reset failed: {}", e);
                HandleOutcome::reply(format!("Reset failed: {}", e))
            }
        }
    }

    fn show_roster(&self) -> HandleOutcome {
        let roster = self.roster.read();
        if roster.is_empty() {
            return HandleOutcome::reply("No roster is loaded.");
        }
        let mut text = if self.config.group_label.is_empty() {
            format!("Roster ({} member(s)):\n", roster.len())
        } else {
            format!("Roster for {} ({} member(s)):\n", self.config.group_label, roster.len())
        };
        for (i, entry) in roster.iter().enumerate() {
            text.push_str(&format!("{}. {} (id: {})\n", i + 1, entry.name, entry.id));
        }
        HandleOutcome::reply(text.trim_end().to_string())
    }

    fn reload_roster(&self) -> HandleOutcome {
        let old_count = self.roster.read().len();
        let fresh = Roster::load(&self.roster_path);
        let new_count = fresh.len();
        // Whole-snapshot swap: readers see the old roster or the new one,
        // never a partially-populated mix.
        *self.roster.write() = fresh;

        if new_count == 0 {
            HandleOutcome::reply("Roster reload produced no members — check the roster file.")
        } else {
            HandleOutcome::reply(format!(
                "Roster reloaded: {} member(s) before, {} now.",
                old_count, new_count
            ))
        }
    }

    fn test_record(&self, msg: &InboundMessage, name: &str, now: NaiveDateTime) -> HandleOutcome {
        let group_id = Self::scope_group_id(msg);
        if let Err(e) = self.store.upsert_read(group_id, name, now) {
            error!("[tracker] Test record failed: {}", e);
            return HandleOutcome::reply(format!("Test record failed: {}", e));
        }
        let roster = self.roster.read();
        if let Some(id) = roster.id_of(name) {
            HandleOutcome::reply(format!("Recorded a read for {} (id: {}).", name, id))
        } else {
            HandleOutcome::reply(format!("Recorded a read for {} (not on roster).", name))
        }
    }

    // ── Whitelist commands ─────────────────────────────────────────────────

    fn persist_whitelist(&self, whitelist: &Whitelist) {
        let Some(path) = &self.config_path else { return };
        let mut config = self.config.clone();
        config.whitelist = whitelist.to_vec();
        if let Err(e) = config.save(path) {
            warn!("[tracker] Whitelist persisted in memory only — config save failed: {}", e);
        }
    }

    fn show_whitelist(&self) -> HandleOutcome {
        let whitelist = self.whitelist.lock();
        if whitelist.is_empty() {
            return HandleOutcome::reply(
                "The whitelist is empty — messages from every group are processed.",
            );
        }
        let mut text = format!("Whitelisted groups ({}):\n", whitelist.len());
        for (i, gid) in whitelist.iter().enumerate() {
            let name = self.store.resolve_group_display_name(gid);
            text.push_str(&format!("{}. {} ({})\n", i + 1, gid, name));
        }
        text.push_str("\nOnly these groups are tracked.");
        HandleOutcome::reply(text)
    }

    fn add_whitelist(&self, msg: &InboundMessage, arg: &str) -> HandleOutcome {
        if msg.is_group {
            return HandleOutcome::reply(
                "The whitelist can only be managed from a direct chat.",
            );
        }
        if arg.is_empty() {
            return HandleOutcome::reply(
                "Specify a group name or id: add whitelist <name-or-id>",
            );
        }

        // Numeric arguments are raw group ids; anything else is resolved
        // against group names seen in the message log.
        if arg.chars().all(|c| c.is_ascii_digit()) {
            let mut whitelist = self.whitelist.lock();
            if !whitelist.add(arg) {
                return HandleOutcome::reply(format!("Group id {} is already whitelisted.", arg));
            }
            self.persist_whitelist(&whitelist);
            let name = self.store.resolve_group_display_name(arg);
            return HandleOutcome::reply(format!("Added group {} ({}) to the whitelist.", arg, name));
        }

        let matches = match self.store.find_groups_by_name_fragment(arg) {
            Ok(matches) => matches,
            Err(e) => {
                error!("[tracker] Whitelist name lookup failed: {}", e);
                return HandleOutcome::reply(format!("Lookup failed: {}", e));
            }
        };
        match matches.as_slice() {
            [] => HandleOutcome::reply(format!(
                "No group name containing \"{}\" has been seen. Check the name, or add by group id.",
                arg
            )),
            [m] => {
                let mut whitelist = self.whitelist.lock();
                if !whitelist.add(&m.group_id) {
                    return HandleOutcome::reply(format!(
                        "\"{}\" (id: {}) is already whitelisted.",
                        m.display_name, m.group_id
                    ));
                }
                self.persist_whitelist(&whitelist);
                HandleOutcome::reply(format!(
                    "Added \"{}\" (id: {}) to the whitelist.",
                    m.display_name, m.group_id
                ))
            }
            many => {
                let whitelist = self.whitelist.lock();
                let mut text = format!(
                    "Several groups match \"{}\" — use the group id, or a more precise name:\n",
                    arg
                );
                for (i, m) in many.iter().enumerate() {
                    let status = if whitelist.contains(&m.group_id) { " (already whitelisted)" } else { "" };
                    text.push_str(&format!("{}. {} (id: {}){}\n", i + 1, m.display_name, m.group_id, status));
                }
                HandleOutcome::reply(text.trim_end().to_string())
            }
        }
    }

    fn remove_whitelist(&self, msg: &InboundMessage, arg: &str) -> HandleOutcome {
        if msg.is_group {
            return HandleOutcome::reply(
                "The whitelist can only be managed from a direct chat.",
            );
        }
        if arg.is_empty() {
            return HandleOutcome::reply(
                "Specify a group name or id: remove whitelist <name-or-id>",
            );
        }

        if arg.chars().all(|c| c.is_ascii_digit()) {
            let mut whitelist = self.whitelist.lock();
            if !whitelist.remove(arg) {
                return HandleOutcome::reply(format!("Group id {} is not on the whitelist.", arg));
            }
            self.persist_whitelist(&whitelist);
            return HandleOutcome::reply(format!("Removed group {} from the whitelist.", arg));
        }

        let matches = match self.store.find_groups_by_name_fragment(arg) {
            Ok(matches) => matches,
            Err(e) => {
                error!("[tracker] Whitelist name lookup failed: {}", e);
                return HandleOutcome::reply(format!("Lookup failed: {}", e));
            }
        };

        // Prefer matches that are actually on the whitelist.
        let mut whitelist = self.whitelist.lock();
        let listed: Vec<_> = matches.iter().filter(|m| whitelist.contains(&m.group_id)).collect();
        match listed.as_slice() {
            [] if matches.is_empty() => HandleOutcome::reply(format!(
                "No group name containing \"{}\" has been seen. Check the name, or remove by group id.",
                arg
            )),
            [] => HandleOutcome::reply(format!(
                "Groups match \"{}\", but none of them are on the whitelist.",
                arg
            )),
            [m] => {
                whitelist.remove(&m.group_id);
                self.persist_whitelist(&whitelist);
                HandleOutcome::reply(format!(
                    "Removed \"{}\" (id: {}) from the whitelist.",
                    m.display_name, m.group_id
                ))
            }
            many => {
                let mut text = format!(
                    "Several whitelisted groups match \"{}\" — use the group id, or a more precise name:\n",
                    arg
                );
                for (i, m) in many.iter().enumerate() {
                    text.push_str(&format!("{}. {} (id: {})\n", i + 1, m.display_name, m.group_id));
                }
                HandleOutcome::reply(text.trim_end().to_string())
            }
        }
    }

    fn clear_whitelist(&self) -> HandleOutcome {
        let mut whitelist = self.whitelist.lock();
        whitelist.clear();
        self.persist_whitelist(&whitelist);
        HandleOutcome::reply("Whitelist cleared — every group is tracked again.")
    }

    fn add_this_group(&self, msg: &InboundMessage) -> HandleOutcome {
        let name = msg
            .group_display_name
            .clone()
            .unwrap_or_else(|| self.store.resolve_group_display_name(&msg.group_id));
        let mut whitelist = self.whitelist.lock();
        if !whitelist.add(&msg.group_id) {
            return HandleOutcome::reply(format!("\"{}\" is already on the whitelist.", name));
        }
        self.persist_whitelist(&whitelist);
        HandleOutcome::reply(format!(
            "Added \"{}\" (id: {}) to the whitelist.",
            name, msg.group_id
        ))
    }

    fn remove_this_group(&self, msg: &InboundMessage) -> HandleOutcome {
        let name = msg
            .group_display_name
            .clone()
            .unwrap_or_else(|| self.store.resolve_group_display_name(&msg.group_id));
        let mut whitelist = self.whitelist.lock();
        if !whitelist.remove(&msg.group_id) {
            return HandleOutcome::reply(format!("\"{}\" is not on the whitelist.", name));
        }
        self.persist_whitelist(&whitelist);
        HandleOutcome::reply(format!(
            "Removed \"{}\" (id: {}) from the whitelist.",
            name, msg.group_id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::roster::RosterEntry;
    use crate::engine::store::{DATE_FMT, TIME_FMT};
    use chrono::NaiveDate;

    fn make_tracker(whitelist: Vec<String>) -> ReadTracker {
        let store = RecordStore::open_in_memory().unwrap();
        let roster = Roster::from_entries(vec![
            RosterEntry { name: "Alice".into(), id: "001".into() },
            RosterEntry { name: "Bob".into(), id: "002".into() },
        ]);
        let config = TrackerConfig {
            read_keyword: "read".into(),
            whitelist,
            ..TrackerConfig::default()
        };
        ReadTracker::from_parts(store, roster, config, PathBuf::from("/nonexistent/roster.json"))
    }

    fn group_msg(text: &str, sender: &str, group: &str) -> InboundMessage {
        InboundMessage {
            text: text.into(),
            sender_display_name: sender.into(),
            group_id: group.into(),
            group_display_name: Some(format!("{} name", group)),
            is_group: true,
            payload: PayloadKind::Text,
        }
    }

    fn private_msg(text: &str, sender: &str) -> InboundMessage {
        InboundMessage {
            text: text.into(),
            sender_display_name: sender.into(),
            group_id: PRIVATE_GROUP.into(),
            group_display_name: None,
            is_group: false,
            payload: PayloadKind::Text,
        }
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIME_FMT).unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FMT).unwrap()
    }

    #[test]
    fn acknowledgement_marks_sender_and_unread_lists_the_rest() {
        let tracker = make_tracker(vec![]);
        let out = tracker.handle_at(&group_msg("read", "Alice", "g1"), at("2026-03-02 09:00:00"));
        assert!(!out.consumed);

        let out = tracker.handle_at(
            &group_msg("query unread members", "Alice", "g1"),
            at("2026-03-02 09:01:00"),
        );
        let reply = out.reply.unwrap();
        assert!(reply.contains("Unread: 1"));
        assert!(reply.contains("Bob (id: 002)"));
    }

    #[test]
    fn repeated_acknowledgement_keeps_one_record_with_latest_time() {
        let tracker = make_tracker(vec![]);
        tracker.handle_at(&group_msg("read", "Alice", "g1"), at("2026-03-02 09:00:00"));
        tracker.handle_at(&group_msg("read", "Alice", "g1"), at("2026-03-02 11:00:00"));

        let records = tracker
            .store()
            .query_read(Some("g1"), day("2026-03-02"), day("2026-03-02"))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].read_time, "2026-03-02 11:00:00");
    }

    #[test]
    fn name_suffixed_keyword_credits_the_named_member() {
        let tracker = make_tracker(vec![]);
        tracker.handle_at(&group_msg("Bobread", "Alice", "g1"), at("2026-03-02 09:00:00"));

        let readers = tracker.store().query_read_for_day("g1", day("2026-03-02")).unwrap();
        assert_eq!(readers, vec!["Bob"]);
    }

    #[test]
    fn reset_flow_requires_explicit_confirmation() {
        let tracker = make_tracker(vec![]);
        for (name, t) in [("Alice", "09:00:00"), ("Bob", "09:01:00"), ("Carol", "09:02:00")] {
            tracker
                .store()
                .upsert_read("g1", name, at(&format!("2026-03-02 {}", t)))
                .unwrap();
        }

        let out = tracker.handle_at(&group_msg("reset records", "Alice", "g1"), at("2026-03-02 10:00:00"));
        assert!(out.reply.unwrap().contains("3 record(s)"));
        // No deletion without the confirm command.
        assert_eq!(tracker.store().count_for_day("g1", day("2026-03-02")).unwrap(), 3);

        let out = tracker.handle_at(&group_msg("confirm reset", "Alice", "g1"), at("2026-03-02 10:01:00"));
        assert!(out.reply.unwrap().contains("deleted 3"));
        assert_eq!(tracker.store().count_for_day("g1", day("2026-03-02")).unwrap(), 0);
    }

    #[test]
    fn sticker_marks_off_roster_sender_as_read() {
        let tracker = make_tracker(vec![]);
        let mut msg = group_msg("", "Carol", "g1");
        msg.payload = PayloadKind::Sticker;
        tracker.handle_at(&msg, at("2026-03-02 09:00:00"));

        let readers = tracker.store().query_read_for_day("g1", day("2026-03-02")).unwrap();
        assert_eq!(readers, vec!["Carol"]);

        let out = tracker.handle_at(
            &group_msg("query read members", "Alice", "g1"),
            at("2026-03-02 09:05:00"),
        );
        assert!(out.reply.unwrap().contains("Carol (not on roster)"));
    }

    #[test]
    fn whitelist_gates_unlisted_groups() {
        let tracker = make_tracker(vec!["g1".into()]);
        tracker.handle_at(&group_msg("read", "Alice", "g2"), at("2026-03-02 09:00:00"));
        assert_eq!(tracker.store().count_read_total().unwrap(), 0);

        tracker.handle_at(&group_msg("read", "Alice", "g1"), at("2026-03-02 09:00:00"));
        assert_eq!(tracker.store().count_read_total().unwrap(), 1);
    }

    #[test]
    fn this_group_command_bypasses_the_gate() {
        let tracker = make_tracker(vec!["g1".into()]);
        let out = tracker.handle_at(
            &group_msg("add this group to whitelist", "Alice", "g2"),
            at("2026-03-02 09:00:00"),
        );
        assert!(out.reply.unwrap().contains("Added"));

        // Now g2 is processed.
        tracker.handle_at(&group_msg("read", "Alice", "g2"), at("2026-03-02 09:01:00"));
        assert_eq!(tracker.store().count_read_total().unwrap(), 1);
    }

    #[test]
    fn whitelist_management_by_name_is_direct_chat_only() {
        let tracker = make_tracker(vec![]);
        let out = tracker.handle_at(
            &group_msg("add whitelist something", "Alice", "g1"),
            at("2026-03-02 09:00:00"),
        );
        assert!(out.reply.unwrap().contains("direct chat"));
    }

    #[test]
    fn whitelist_add_by_name_fragment() {
        let tracker = make_tracker(vec![]);
        // Seed the message log with a group name to resolve against.
        tracker.handle_at(&group_msg("hello", "Alice", "g1"), at("2026-03-02 09:00:00"));

        let out = tracker.handle_at(&private_msg("add whitelist g1 name", "Admin"), at("2026-03-02 09:01:00"));
        assert!(out.reply.unwrap().contains("Added \"g1 name\" (id: g1)"));

        // g2 is now gated out.
        tracker.handle_at(&group_msg("read", "Bob", "g2"), at("2026-03-02 09:02:00"));
        assert_eq!(tracker.store().count_read_total().unwrap(), 0);
    }

    #[test]
    fn retention_sweep_runs_before_processing() {
        let tracker = make_tracker(vec![]);
        tracker.store().upsert_read("g1", "Old", at("2026-02-01 09:00:00")).unwrap();

        // Any inbound event triggers the sweep (default horizon: 7 days).
        tracker.handle_at(&group_msg("hello", "Alice", "g1"), at("2026-03-02 09:00:00"));
        assert_eq!(tracker.store().count_read_total().unwrap(), 0);
    }

    #[test]
    fn private_context_reports_across_groups() {
        let tracker = make_tracker(vec![]);
        tracker.handle_at(&group_msg("read", "Alice", "g1"), at("2026-03-02 09:00:00"));
        tracker.handle_at(&group_msg("read", "Bob", "g2"), at("2026-03-02 09:01:00"));

        let out = tracker.handle_at(&private_msg("query unread members", "Admin"), at("2026-03-02 09:05:00"));
        let reply = out.reply.unwrap();
        assert!(reply.contains("[Group: g1 name]"));
        assert!(reply.contains("[Group: g2 name]"));
    }

    #[test]
    fn ordinary_chat_is_ignored_silently() {
        let tracker = make_tracker(vec![]);
        let out = tracker.handle_at(&group_msg("good morning", "Alice", "g1"), at("2026-03-02 09:00:00"));
        assert_eq!(out, HandleOutcome::ignored());
        assert_eq!(tracker.store().count_read_total().unwrap(), 0);
    }

    #[test]
    fn show_roster_lists_members_in_order() {
        let tracker = make_tracker(vec![]);
        let out = tracker.handle_at(&group_msg("show roster", "Alice", "g1"), at("2026-03-02 09:00:00"));
        let reply = out.reply.unwrap();
        assert!(reply.contains("1. Alice (id: 001)"));
        assert!(reply.contains("2. Bob (id: 002)"));
    }

    #[test]
    fn reload_roster_swaps_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let roster_path = dir.path().join("roster.json");
        std::fs::write(&roster_path, r#"{"students":[{"name":"Carol","id":"003"}]}"#).unwrap();

        let store = RecordStore::open_in_memory().unwrap();
        let roster = Roster::from_entries(vec![RosterEntry { name: "Alice".into(), id: "001".into() }]);
        let config = TrackerConfig { read_keyword: "read".into(), ..TrackerConfig::default() };
        let tracker = ReadTracker::from_parts(store, roster, config, roster_path);

        let out = tracker.handle_at(&private_msg("reload roster", "Admin"), at("2026-03-02 09:00:00"));
        assert!(out.reply.unwrap().contains("1 member(s) before, 1 now"));
        assert!(tracker.roster.read().contains("Carol"));
        assert!(!tracker.roster.read().contains("Alice"));
    }

    #[test]
    fn roster_gated_mode_drops_off_roster_senders() {
        let store = RecordStore::open_in_memory().unwrap();
        let roster = Roster::from_entries(vec![RosterEntry { name: "Alice".into(), id: "001".into() }]);
        let config = TrackerConfig {
            read_keyword: "read".into(),
            roster_gated: true,
            ..TrackerConfig::default()
        };
        let tracker = ReadTracker::from_parts(store, roster, config, PathBuf::from("/nonexistent"));

        tracker.handle_at(&group_msg("read", "Stranger", "g1"), at("2026-03-02 09:00:00"));
        assert_eq!(tracker.store().count_read_total().unwrap(), 0);

        tracker.handle_at(&group_msg("read", "Alice", "g1"), at("2026-03-02 09:01:00"));
        assert_eq!(tracker.store().count_read_total().unwrap(), 1);
    }
}
