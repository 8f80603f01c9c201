pub mod controller;
pub mod credential_store;
pub mod facts;
pub mod host;
pub mod machine;
pub mod view;

pub use controller::{ActionOutcome, RejectReason, SessionFlowController};
pub use credential_store::{CredentialSnapshot, CredentialStore};
pub use facts::SessionFacts;
pub use host::{Collaborators, HostSignal, RecordingCollaborators};
pub use machine::{decide, labels, Action, Decision, Effect, ResponseLabels};
pub use view::SessionView;
