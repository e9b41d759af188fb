//! Infrastructure adapters.

mod event_channel;

pub use event_channel::{spawn_event_logger, BroadcastEventChannel};
