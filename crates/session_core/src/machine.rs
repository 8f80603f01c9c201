//! Pure decision logic: which actions are legal for a status and which effects follow.

use serde::{Deserialize, Serialize};
use shared::domain::{AttributeIdentifier, DisclosureGroup, IrmaAction, SessionStatus};

use crate::facts::SessionFacts;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Respond { proceed: bool },
    SubmitPin { code: String },
    RequestMail,
    Dismiss,
    GoToEnrollment,
}

impl Action {
    pub fn accept() -> Self {
        Action::Respond { proceed: true }
    }

    pub fn decline() -> Self {
        Action::Respond { proceed: false }
    }

    pub fn submit_pin(code: impl Into<String>) -> Self {
        Action::SubmitPin { code: code.into() }
    }

    /// Response-style actions answer the protocol engine and fire at most once per status.
    /// Navigational actions are never de-duplicated.
    pub fn is_response(&self) -> bool {
        matches!(self, Action::Respond { .. } | Action::SubmitPin { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Respond { proceed: true } => "accept",
            Action::Respond { proceed: false } => "decline",
            Action::SubmitPin { .. } => "submit_pin",
            Action::RequestMail => "request_mail",
            Action::Dismiss => "dismiss",
            Action::GoToEnrollment => "go_to_enrollment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    Proceed {
        disclosure_choices: Vec<AttributeIdentifier>,
    },
    Decline,
    SubmitPin {
        code: String,
    },
    CancelPin,
    SendMail,
    NavigateBack,
    NavigateToEnrollment,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decision {
    pub allowed: bool,
    pub effects: Vec<Effect>,
}

impl Decision {
    fn reject() -> Self {
        Self::default()
    }

    fn allow(effects: Vec<Effect>) -> Self {
        Self {
            allowed: true,
            effects,
        }
    }
}

pub fn decide(status: SessionStatus, facts: &SessionFacts, action: &Action) -> Decision {
    use SessionStatus::*;

    match (status, action) {
        (RequestPermission | RequestDisclosurePermission, Action::Respond { proceed: true }) => {
            Decision::allow(vec![Effect::Proceed {
                disclosure_choices: facts.chosen_attributes(),
            }])
        }
        (RequestPermission | RequestDisclosurePermission, Action::Respond { proceed: false }) => {
            Decision::allow(vec![Effect::Decline])
        }
        (RequestPin, Action::SubmitPin { code }) => Decision::allow(vec![Effect::SubmitPin {
            code: code.clone(),
        }]),
        (RequestPin, Action::Respond { proceed: false }) => Decision::allow(vec![Effect::CancelPin]),
        (Success, Action::RequestMail) if facts.has_result() => {
            Decision::allow(vec![Effect::SendMail, Effect::NavigateBack])
        }
        (
            Success | Failure | Cancelled | UnsatisfiableRequest | MissingKeyshareEnrollment,
            Action::Dismiss,
        ) => Decision::allow(vec![Effect::NavigateBack]),
        (MissingKeyshareEnrollment, Action::GoToEnrollment) => {
            Decision::allow(vec![Effect::NavigateToEnrollment])
        }
        _ => Decision::reject(),
    }
}

pub fn is_legal(status: SessionStatus, facts: &SessionFacts, action: &Action) -> bool {
    decide(status, facts, action).allowed
}

/// Translation keys for the affirmative and negative footer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseLabels {
    pub yes: &'static str,
    pub no: &'static str,
}

pub const LABEL_ACCEPT: &str = "Session.Footer.accept";
pub const LABEL_DECLINE: &str = "Session.Footer.decline";
pub const LABEL_NEXT: &str = "Session.Footer.next";
pub const LABEL_SUBMIT: &str = "Session.Footer.submit";
pub const LABEL_CANCEL: &str = "Session.Footer.cancel";

pub fn labels(
    status: SessionStatus,
    irma_action: IrmaAction,
    to_disclose: &[DisclosureGroup],
) -> Option<ResponseLabels> {
    match status {
        SessionStatus::RequestPin => Some(ResponseLabels {
            yes: LABEL_SUBMIT,
            no: LABEL_CANCEL,
        }),
        SessionStatus::RequestPermission
            if irma_action == IrmaAction::Issuing && !to_disclose.is_empty() =>
        {
            Some(ResponseLabels {
                yes: LABEL_NEXT,
                no: LABEL_DECLINE,
            })
        }
        SessionStatus::RequestPermission | SessionStatus::RequestDisclosurePermission => {
            Some(ResponseLabels {
                yes: LABEL_ACCEPT,
                no: LABEL_DECLINE,
            })
        }
        SessionStatus::Success
        | SessionStatus::Failure
        | SessionStatus::Cancelled
        | SessionStatus::UnsatisfiableRequest
        | SessionStatus::MissingKeyshareEnrollment => None,
    }
}

#[cfg(test)]
#[path = "tests/machine_tests.rs"]
mod tests;
