// Readtrack Engine — Roster Store
//
// The roster is the authoritative name → id mapping of expected members,
// loaded from a JSON file shaped like:
//
//   { "students": [ { "name": "Alice", "id": "001" }, … ] }
//
// Load failures never reach the caller: a missing file, a parse error, or an
// empty list all degrade to an empty roster (each logged distinguishably).
// An empty roster only disables unread computation — ingestion and
// attribution keep working, with every attributed name labelled
// "(not on roster)" in reports.
//
// Iteration order is the file order; reports and the attribution engine both
// rely on it being stable.

use log::{error, info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub name: String,
    pub id: String,
}

/// Immutable roster snapshot. Replaced wholesale on reload — the handler
/// holds it behind a `parking_lot::RwLock` and swaps the whole value, so a
/// reader never observes a partially-populated roster.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

#[derive(Deserialize)]
struct RosterFile {
    #[serde(default)]
    students: Vec<RosterFileEntry>,
}

#[derive(Deserialize)]
struct RosterFileEntry {
    name: Option<String>,
    id: Option<String>,
}

impl Roster {
    /// Load the roster from `path`. Never fails; degrades to empty.
    pub fn load(path: &Path) -> Roster {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("[roster] Roster file not readable at {:?}: {}", path, e);
                return Roster::default();
            }
        };

        let parsed: RosterFile = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("[roster] Roster file at {:?} is malformed: {}", path, e);
                return Roster::default();
            }
        };

        let mut entries = Vec::new();
        for entry in parsed.students {
            match (entry.name, entry.id) {
                (Some(name), Some(id)) if !name.is_empty() => {
                    entries.push(RosterEntry { name, id });
                }
                // Entries missing either field are silently skipped.
                _ => {}
            }
        }

        if entries.is_empty() {
            warn!("[roster] Loaded an empty roster from {:?}", path);
        } else {
            info!("[roster] Loaded {} member(s) from {:?}", entries.len(), path);
        }
        Roster { entries }
    }

    pub fn from_entries(entries: Vec<RosterEntry>) -> Roster {
        Roster { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.id.as_str())
    }

    /// Entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter()
    }

    /// Member names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}
