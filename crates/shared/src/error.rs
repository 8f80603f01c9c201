use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown session status '{0}'")]
    UnknownStatus(String),
    #[error("no active session to apply a status update to")]
    NoActiveSession,
    #[error("disclosure group {index} does not exist")]
    UnknownDisclosureGroup { index: usize },
    #[error("attribute '{attribute}' is not a candidate of disclosure group {index}")]
    UnknownCandidate { index: usize, attribute: String },
    #[error("disclosure choices cannot be changed in status {status}")]
    ChoiceNotAllowed { status: String },
    #[error("invalid image message payload: {0}")]
    InvalidImagePayload(String),
}

impl SessionError {
    /// Host contract violations that leave the session in an undefined state.
    pub fn is_malformed_facts(&self) -> bool {
        matches!(
            self,
            SessionError::UnknownStatus(_) | SessionError::NoActiveSession
        )
    }
}
