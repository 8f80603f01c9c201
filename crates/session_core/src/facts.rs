//! Session facts and the reducer that folds protocol engine events into them.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{
        AttributeIdentifier, DisclosureGroup, IrmaAction, MessageType, SchemeManagerId,
        SessionStatus,
    },
    error::SessionError,
    protocol::{HostEvent, SessionFailure},
};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFacts {
    pub irma_action: IrmaAction,
    #[serde(default)]
    pub to_disclose: Vec<DisclosureGroup>,
    #[serde(default)]
    pub disclosure_choices: Vec<Option<AttributeIdentifier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
    #[serde(default)]
    pub validation_forced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionFailure>,
    #[serde(default)]
    pub missing_attributes: Vec<DisclosureGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme_manager_id: Option<SchemeManagerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

impl SessionFacts {
    pub fn new(irma_action: IrmaAction) -> Self {
        Self {
            irma_action,
            ..Default::default()
        }
    }

    /// Replaces the requested disclosures and preselects the first candidate of each group.
    pub fn with_to_disclose(mut self, to_disclose: Vec<DisclosureGroup>) -> Self {
        self.set_to_disclose(to_disclose);
        self
    }

    /// Facts of a new permission request; nothing from an earlier session carries over.
    fn for_request(
        irma_action: IrmaAction,
        server_name: Option<String>,
        to_disclose: Vec<DisclosureGroup>,
    ) -> Self {
        let mut facts = Self::new(irma_action);
        facts.server_name = server_name;
        facts.set_to_disclose(to_disclose);
        facts
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn set_to_disclose(&mut self, to_disclose: Vec<DisclosureGroup>) {
        self.disclosure_choices = to_disclose
            .iter()
            .map(|group| group.first().cloned())
            .collect();
        self.to_disclose = to_disclose;
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    /// The attributes the user currently agrees to disclose, one per group.
    pub fn chosen_attributes(&self) -> Vec<AttributeIdentifier> {
        self.disclosure_choices.iter().flatten().cloned().collect()
    }

    pub(crate) fn choose(
        &mut self,
        index: usize,
        attribute: AttributeIdentifier,
    ) -> Result<(), SessionError> {
        let group = self
            .to_disclose
            .get(index)
            .ok_or(SessionError::UnknownDisclosureGroup { index })?;
        if !group.contains(&attribute) {
            return Err(SessionError::UnknownCandidate {
                index,
                attribute: attribute.attribute_type,
            });
        }

        if self.disclosure_choices.len() < self.to_disclose.len() {
            self.disclosure_choices.resize(self.to_disclose.len(), None);
        }
        self.disclosure_choices[index] = Some(attribute);
        Ok(())
    }
}

/// Folds a host event into the next `(status, facts)` pair.
///
/// `current` is `None` until the first session event arrived. Returns
/// `Ok(None)` for events that do not concern the session (credential reloads).
pub fn reduce(
    current: Option<(SessionStatus, &SessionFacts)>,
    event: &HostEvent,
) -> Result<Option<(SessionStatus, SessionFacts)>, SessionError> {
    let mut facts = current.map(|(_, facts)| facts.clone()).unwrap_or_default();

    let status = match event {
        HostEvent::StatusUpdate {
            irma_action,
            status: phase,
        } => {
            let Some((status, _)) = current else {
                return Err(SessionError::NoActiveSession);
            };
            facts.irma_action = *irma_action;
            facts.phase = Some(phase.clone());
            status
        }
        HostEvent::RequestIssuancePermission {
            server_name,
            to_disclose,
        } => {
            facts = SessionFacts::for_request(
                IrmaAction::Issuing,
                server_name.clone(),
                to_disclose.clone(),
            );
            SessionStatus::RequestPermission
        }
        HostEvent::RequestVerificationPermission {
            server_name,
            to_disclose,
        } => {
            facts = SessionFacts::for_request(
                IrmaAction::Disclosing,
                server_name.clone(),
                to_disclose.clone(),
            );
            SessionStatus::RequestDisclosurePermission
        }
        HostEvent::RequestSignaturePermission {
            server_name,
            to_disclose,
            message,
            message_type,
        } => {
            facts = SessionFacts::for_request(
                IrmaAction::Signing,
                server_name.clone(),
                to_disclose.clone(),
            );
            facts.message = message.clone();
            facts.message_type = *message_type;
            SessionStatus::RequestPermission
        }
        HostEvent::RequestPin { remaining_attempts } => {
            facts.validation_forced = matches!(
                (facts.remaining_attempts, *remaining_attempts),
                (Some(previous), Some(now)) if now < previous
            );
            facts.remaining_attempts = *remaining_attempts;
            SessionStatus::RequestPin
        }
        HostEvent::Success {
            irma_action,
            result,
        } => {
            if let Some(action) = irma_action {
                facts.irma_action = *action;
            }
            if result.as_deref() == Some("") {
                warn!("session succeeded with an empty result; treating it as a deliverable result");
            }
            facts.result = result.clone();
            SessionStatus::Success
        }
        HostEvent::Failure { irma_action, error } => {
            if let Some(action) = irma_action {
                facts.irma_action = *action;
            }
            facts.error = Some(error.clone());
            SessionStatus::Failure
        }
        HostEvent::Cancelled => SessionStatus::Cancelled,
        HostEvent::UnsatisfiableRequest { missing_attributes } => {
            facts.missing_attributes = missing_attributes.clone();
            SessionStatus::UnsatisfiableRequest
        }
        HostEvent::MissingKeyshareEnrollment { scheme_manager_id } => {
            facts.scheme_manager_id = Some(scheme_manager_id.clone());
            SessionStatus::MissingKeyshareEnrollment
        }
        HostEvent::CredentialsLoaded { .. } => return Ok(None),
    };

    if status != SessionStatus::RequestPin {
        facts.validation_forced = false;
    }

    Ok(Some((status, facts)))
}

#[cfg(test)]
#[path = "tests/facts_tests.rs"]
mod tests;
