//! Data the presentation layer needs to render a signing session screen.
//! Text is exposed as translation keys; lookup happens in the shell.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use shared::{
    domain::{AttributeIdentifier, DisclosureGroup, MessageType, SessionStatus},
    error::SessionError,
    protocol::SessionFailure,
};
use tracing::warn;

use crate::{
    controller::SessionFlowController,
    credential_store::CredentialStore,
    facts::SessionFacts,
    machine::{self, Action},
};

pub const HEADER_TITLE_KEY: &str = "Session.SigningSession.headerTitle";
pub const DISMISS_KEY: &str = "Session.Footer.dismiss";
pub const SEND_MAIL_KEY: &str = "Session.Footer.sendMail";
pub const REGISTER_KEY: &str = "Session.StatusCard.explanation.registerMyIrma";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: String },
    Image { data_uri: String },
    /// The requestor sent a message that cannot be shown; the rest of the screen still renders.
    Invalid { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Explanation {
    /// A single explanation line; `optional` keys may have no translation.
    Key { key: String, optional: bool },
    /// Explanation wrapped around the requestor's message.
    AroundMessage { before: String, after: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCard {
    pub heading_key: String,
    pub explanation: Explanation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_button_key: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisclosureGroupView {
    pub candidates: Vec<AttributeIdentifier>,
    /// Candidates backed by a stored credential; equals `candidates` until credentials load.
    pub available: Vec<AttributeIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen: Option<AttributeIdentifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisclosureView {
    pub hide_unchosen: bool,
    pub groups: Vec<DisclosureGroupView>,
    /// Indices of groups no stored credential can satisfy. Empty until credentials load.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unsatisfiable_groups: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinEntryView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
    pub validation_forced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FooterAction {
    Accept,
    Decline,
    SubmitPin,
    SendMail,
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FooterButton {
    pub action: FooterAction,
    pub label_key: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub status: SessionStatus,
    pub header_title_key: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    pub status_card: StatusCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_disclosures: Vec<DisclosureGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclosures: Option<DisclosureView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_entry: Option<PinEntryView>,
    pub automatic_scroll: bool,
    pub footer: Vec<FooterButton>,
}

impl SessionView {
    pub fn build(controller: &SessionFlowController, store: &CredentialStore) -> Self {
        let status = controller.current_status();
        let facts = controller.current_facts();

        let message = match status {
            SessionStatus::RequestPermission | SessionStatus::Success => {
                message_content(facts).unwrap_or_else(|err| {
                    warn!(%status, error = %err, "requestor message cannot be displayed");
                    Some(MessageContent::Invalid {
                        reason: err.to_string(),
                    })
                })
            }
            _ => None,
        };

        Self {
            status,
            header_title_key: HEADER_TITLE_KEY,
            server_name: facts.server_name.clone(),
            status_card: status_card(status),
            message,
            error: match status {
                SessionStatus::Failure => facts.error.clone(),
                _ => None,
            },
            missing_disclosures: match status {
                SessionStatus::UnsatisfiableRequest => facts.missing_attributes.clone(),
                _ => Vec::new(),
            },
            disclosures: disclosure_view(status, facts, store),
            pin_entry: (status == SessionStatus::RequestPin).then(|| PinEntryView {
                remaining_attempts: facts.remaining_attempts,
                validation_forced: facts.validation_forced,
            }),
            automatic_scroll: status != SessionStatus::RequestPin,
            footer: footer(controller),
        }
    }
}

pub fn message_content(facts: &SessionFacts) -> Result<Option<MessageContent>, SessionError> {
    let Some(message) = &facts.message else {
        return Ok(None);
    };

    match facts.message_type {
        MessageType::Text => Ok(Some(MessageContent::Text {
            text: message.clone(),
        })),
        MessageType::Image => {
            STANDARD
                .decode(message.trim())
                .map_err(|err| SessionError::InvalidImagePayload(err.to_string()))?;
            Ok(Some(MessageContent::Image {
                data_uri: format!("data:image/jpeg;base64,{}", message.trim()),
            }))
        }
    }
}

fn status_card(status: SessionStatus) -> StatusCard {
    let heading_key = match status {
        SessionStatus::Success | SessionStatus::Cancelled | SessionStatus::RequestPermission => {
            format!("Session.SigningSession.{status}Heading")
        }
        _ => format!("Session.StatusCard.heading.{status}"),
    };

    let explanation = match status {
        SessionStatus::UnsatisfiableRequest => Explanation::Key {
            key: "Session.SigningSession.unsatisfiableRequestExplanation".to_string(),
            optional: false,
        },
        SessionStatus::RequestPermission | SessionStatus::Success => Explanation::AroundMessage {
            before: format!("Session.SigningSession.{status}.beforeExplanation"),
            after: format!("Session.SigningSession.{status}.afterExplanation"),
        },
        SessionStatus::MissingKeyshareEnrollment => Explanation::Key {
            key: format!("Session.StatusCard.explanation.{status}"),
            optional: false,
        },
        _ => Explanation::Key {
            key: format!("Session.StatusCard.explanation.{status}"),
            optional: true,
        },
    };

    StatusCard {
        heading_key,
        explanation,
        enrollment_button_key: (status == SessionStatus::MissingKeyshareEnrollment)
            .then_some(REGISTER_KEY),
    }
}

fn disclosure_view(
    status: SessionStatus,
    facts: &SessionFacts,
    store: &CredentialStore,
) -> Option<DisclosureView> {
    if !matches!(
        status,
        SessionStatus::RequestPermission | SessionStatus::Success
    ) {
        return None;
    }

    let loaded = store.is_loaded();
    let groups = facts
        .to_disclose
        .iter()
        .enumerate()
        .map(|(index, group)| DisclosureGroupView {
            candidates: group.candidates().to_vec(),
            available: if loaded {
                store.candidates_for(group)
            } else {
                group.candidates().to_vec()
            },
            chosen: facts.disclosure_choices.get(index).cloned().flatten(),
        })
        .collect();

    let unsatisfiable_groups = if loaded && status == SessionStatus::RequestPermission {
        store.unsatisfiable_groups(&facts.to_disclose)
    } else {
        Vec::new()
    };

    Some(DisclosureView {
        hide_unchosen: status == SessionStatus::Success,
        groups,
        unsatisfiable_groups,
    })
}

fn footer(controller: &SessionFlowController) -> Vec<FooterButton> {
    let status = controller.current_status();
    let facts = controller.current_facts();

    if let Some(labels) = machine::labels(status, facts.irma_action, &facts.to_disclose) {
        if controller.has_responded() {
            return Vec::new();
        }
        let yes = if status == SessionStatus::RequestPin {
            FooterAction::SubmitPin
        } else {
            FooterAction::Accept
        };
        return vec![
            FooterButton {
                action: yes,
                label_key: labels.yes,
            },
            FooterButton {
                action: FooterAction::Decline,
                label_key: labels.no,
            },
        ];
    }

    let mut buttons = Vec::new();
    if controller.is_action_available(&Action::RequestMail) {
        buttons.push(FooterButton {
            action: FooterAction::SendMail,
            label_key: SEND_MAIL_KEY,
        });
    }
    if controller.is_action_available(&Action::Dismiss) {
        buttons.push(FooterButton {
            action: FooterAction::Dismiss,
            label_key: DISMISS_KEY,
        });
    }
    buttons
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
