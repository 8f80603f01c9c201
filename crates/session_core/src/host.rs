//! Seam between the session core and the host's protocol engine, navigation and mail.

use shared::{domain::AttributeIdentifier, protocol::OutgoingAction};
use tracing::debug;

use crate::{facts::SessionFacts, machine::Effect};

/// Host-provided callbacks. Every call is fire-and-forget: the outcome flows
/// back as a later status update.
pub trait Collaborators {
    fn respond_permission(&mut self, proceed: bool, disclosure_choices: Vec<AttributeIdentifier>);
    fn respond_pin(&mut self, proceed: bool, pin: Option<String>);
    fn send_mail(&mut self, result: Option<&str>);
    fn navigate_back(&mut self);
    fn navigate_to_enrollment(&mut self);
}

pub fn dispatch(effect: &Effect, facts: &SessionFacts, host: &mut impl Collaborators) {
    debug!(?effect, "dispatching session effect");
    match effect {
        Effect::Proceed { disclosure_choices } => {
            host.respond_permission(true, disclosure_choices.clone());
        }
        Effect::Decline => host.respond_permission(false, Vec::new()),
        Effect::SubmitPin { code } => host.respond_pin(true, Some(code.clone())),
        Effect::CancelPin => host.respond_pin(false, None),
        Effect::SendMail => host.send_mail(facts.result.as_deref()),
        Effect::NavigateBack => host.navigate_back(),
        Effect::NavigateToEnrollment => host.navigate_to_enrollment(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSignal {
    Protocol(OutgoingAction),
    SendMail { result: Option<String> },
    NavigateBack,
    NavigateToEnrollment,
}

/// Collects every host call in order.
#[derive(Debug, Default)]
pub struct RecordingCollaborators {
    pub signals: Vec<HostSignal>,
}

impl RecordingCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> Vec<HostSignal> {
        std::mem::take(&mut self.signals)
    }
}

impl Collaborators for RecordingCollaborators {
    fn respond_permission(&mut self, proceed: bool, disclosure_choices: Vec<AttributeIdentifier>) {
        self.signals
            .push(HostSignal::Protocol(OutgoingAction::RespondPermission {
                proceed,
                disclosure_choices,
            }));
    }

    fn respond_pin(&mut self, proceed: bool, pin: Option<String>) {
        self.signals
            .push(HostSignal::Protocol(OutgoingAction::RespondPin { proceed, pin }));
    }

    fn send_mail(&mut self, result: Option<&str>) {
        self.signals.push(HostSignal::SendMail {
            result: result.map(str::to_string),
        });
    }

    fn navigate_back(&mut self) {
        self.signals.push(HostSignal::NavigateBack);
    }

    fn navigate_to_enrollment(&mut self) {
        self.signals.push(HostSignal::NavigateToEnrollment);
    }
}
