// Readtrack Engine — read-acknowledgement tracking core
//
// Module layout:
//   config       — tracker configuration (JSON file, safe defaults)
//   roster       — name → id roster, reload-on-demand
//   whitelist    — optional group allow-list, persisted on mutation
//   store        — SQLite record store (read records + message log)
//   attribution  — pure text → member attribution rules
//   commands     — pure text → Command parse
//   report       — read/unread report rendering
//   handler      — event pipeline wiring (ReadTracker)

pub mod attribution;
pub mod commands;
pub mod config;
pub mod handler;
pub mod report;
pub mod roster;
pub mod store;
pub mod whitelist;
