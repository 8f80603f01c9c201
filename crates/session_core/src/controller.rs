use serde::Serialize;
use shared::{
    domain::{AttributeIdentifier, SessionStatus},
    error::SessionError,
    protocol::HostEvent,
};
use tracing::{debug, info, warn};

use crate::{
    facts::{self, SessionFacts},
    host::{self, Collaborators},
    machine::{self, Action, Effect},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The action is not offered in the current status.
    IllegalAction,
    /// A response was already accepted for the current status.
    DuplicateResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Accepted { effects: Vec<Effect> },
    Rejected { reason: RejectReason },
}

impl ActionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ActionOutcome::Accepted { .. })
    }

    fn rejected(reason: RejectReason) -> Self {
        ActionOutcome::Rejected { reason }
    }
}

/// Drives one session: owns its status, facts and the per-status "responded" flag.
#[derive(Debug, Clone)]
pub struct SessionFlowController {
    status: SessionStatus,
    facts: SessionFacts,
    responded: bool,
}

impl SessionFlowController {
    pub fn new(status: SessionStatus, facts: SessionFacts) -> Self {
        Self {
            status,
            facts,
            responded: false,
        }
    }

    /// Builds a controller from the first session event pushed by the host.
    pub fn from_event(event: &HostEvent) -> Result<Option<Self>, SessionError> {
        Ok(facts::reduce(None, event)?.map(|(status, facts)| Self::new(status, facts)))
    }

    pub fn current_status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_facts(&self) -> &SessionFacts {
        &self.facts
    }

    pub fn has_responded(&self) -> bool {
        self.responded
    }

    pub fn update(&mut self, status: SessionStatus, facts: SessionFacts) {
        if status != self.status {
            info!(from = %self.status, to = %status, "session status changed");
            self.responded = false;
        }
        self.status = status;
        self.facts = facts;
    }

    /// Update with a status string as received from the host. An unknown status
    /// leaves the controller untouched.
    pub fn update_from_host(
        &mut self,
        raw_status: &str,
        facts: SessionFacts,
    ) -> Result<(), SessionError> {
        let status = raw_status.parse::<SessionStatus>().map_err(|err| {
            warn!(status = raw_status, "refusing update into unknown session status");
            err
        })?;
        self.update(status, facts);
        Ok(())
    }

    pub fn apply_event(&mut self, event: &HostEvent) -> Result<(), SessionError> {
        match facts::reduce(Some((self.status, &self.facts)), event) {
            Ok(Some((status, facts))) => {
                debug!(event = event.kind(), "applied host event");
                self.update(status, facts);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                warn!(event = event.kind(), error = %err, "rejected host event");
                Err(err)
            }
        }
    }

    pub fn is_action_available(&self, action: &Action) -> bool {
        if action.is_response() && self.responded {
            return false;
        }
        machine::is_legal(self.status, &self.facts, action)
    }

    /// Only response actions set the `responded` flag; navigational actions never touch it.
    pub fn act(&mut self, action: &Action, host: &mut impl Collaborators) -> ActionOutcome {
        let decision = machine::decide(self.status, &self.facts, action);
        if !decision.allowed {
            debug!(action = action.name(), status = %self.status, "rejected illegal action");
            return ActionOutcome::rejected(RejectReason::IllegalAction);
        }

        if action.is_response() {
            if self.responded {
                debug!(action = action.name(), status = %self.status, "ignored duplicate response");
                return ActionOutcome::rejected(RejectReason::DuplicateResponse);
            }
            self.responded = true;
        }

        for effect in &decision.effects {
            host::dispatch(effect, &self.facts, host);
        }

        debug!(action = action.name(), status = %self.status, "accepted action");
        ActionOutcome::Accepted {
            effects: decision.effects,
        }
    }

    /// Records which candidate of a disclosure group the user wants to reveal.
    pub fn choose_disclosure(
        &mut self,
        index: usize,
        attribute: AttributeIdentifier,
    ) -> Result<(), SessionError> {
        let permission_status = matches!(
            self.status,
            SessionStatus::RequestPermission | SessionStatus::RequestDisclosurePermission
        );
        if !permission_status || self.responded {
            return Err(SessionError::ChoiceNotAllowed {
                status: self.status.to_string(),
            });
        }
        self.facts.choose(index, attribute)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
