// Readtrack — group-chat read-acknowledgement tracker
// Hosted as a library by a chat-bot runtime: the host delivers one inbound
// event at a time to ReadTracker::handle() and forwards any reply text back
// to the chat. Everything else (transport, dispatch, reply delivery) is the
// host's problem.

pub mod atoms;
pub mod engine;

pub use atoms::error::{TrackerError, TrackerResult};
pub use atoms::types::{HandleOutcome, InboundMessage, PayloadKind};
pub use engine::config::TrackerConfig;
pub use engine::handler::ReadTracker;
