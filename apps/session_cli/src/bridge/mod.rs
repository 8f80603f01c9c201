//! Host bridge: script intake, the UI loop driving the session, and effect dispatch back to the host.

pub mod orchestration;
pub mod runtime;
pub mod script;
