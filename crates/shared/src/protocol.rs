use serde::{Deserialize, Serialize};

use crate::domain::{
    AttributeIdentifier, CredentialRecord, DisclosureGroup, IrmaAction, MessageType,
    SchemeManagerId,
};

/// Failure details reported by the protocol engine when a session fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFailure {
    pub error_type: String,
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_status: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_error: Option<serde_json::Value>,
}

/// Events pushed by the host: the protocol engine's session handler callbacks
/// and the credential manager's reload notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum HostEvent {
    #[serde(rename = "SessionHandler.StatusUpdate")]
    StatusUpdate {
        irma_action: IrmaAction,
        status: String,
    },
    #[serde(rename = "SessionHandler.RequestIssuancePermission")]
    RequestIssuancePermission {
        #[serde(default)]
        server_name: Option<String>,
        #[serde(default)]
        to_disclose: Vec<DisclosureGroup>,
    },
    #[serde(rename = "SessionHandler.RequestVerificationPermission")]
    RequestVerificationPermission {
        #[serde(default)]
        server_name: Option<String>,
        #[serde(default)]
        to_disclose: Vec<DisclosureGroup>,
    },
    #[serde(rename = "SessionHandler.RequestSignaturePermission")]
    RequestSignaturePermission {
        #[serde(default, alias = "requesterName")]
        server_name: Option<String>,
        #[serde(default)]
        to_disclose: Vec<DisclosureGroup>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        message_type: MessageType,
    },
    #[serde(rename = "SessionHandler.RequestPin")]
    RequestPin {
        #[serde(default)]
        remaining_attempts: Option<u32>,
    },
    #[serde(rename = "SessionHandler.Success")]
    Success {
        #[serde(default)]
        irma_action: Option<IrmaAction>,
        #[serde(default)]
        result: Option<String>,
    },
    #[serde(rename = "SessionHandler.Failure")]
    Failure {
        #[serde(default)]
        irma_action: Option<IrmaAction>,
        #[serde(flatten)]
        error: SessionFailure,
    },
    #[serde(rename = "SessionHandler.Cancelled")]
    Cancelled,
    #[serde(rename = "SessionHandler.UnsatisfiableRequest")]
    UnsatisfiableRequest {
        #[serde(default)]
        missing_attributes: Vec<DisclosureGroup>,
    },
    #[serde(rename = "SessionHandler.MissingKeyshareEnrollment")]
    MissingKeyshareEnrollment { scheme_manager_id: SchemeManagerId },
    #[serde(rename = "CredentialManager.Credentials")]
    CredentialsLoaded { credentials: Vec<CredentialRecord> },
}

impl HostEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::StatusUpdate { .. } => "status_update",
            HostEvent::RequestIssuancePermission { .. } => "request_issuance_permission",
            HostEvent::RequestVerificationPermission { .. } => "request_verification_permission",
            HostEvent::RequestSignaturePermission { .. } => "request_signature_permission",
            HostEvent::RequestPin { .. } => "request_pin",
            HostEvent::Success { .. } => "success",
            HostEvent::Failure { .. } => "failure",
            HostEvent::Cancelled => "cancelled",
            HostEvent::UnsatisfiableRequest { .. } => "unsatisfiable_request",
            HostEvent::MissingKeyshareEnrollment { .. } => "missing_keyshare_enrollment",
            HostEvent::CredentialsLoaded { .. } => "credentials_loaded",
        }
    }
}

/// Answers sent back to the protocol engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum OutgoingAction {
    #[serde(rename = "SessionHandler.RespondPermission")]
    RespondPermission {
        proceed: bool,
        disclosure_choices: Vec<AttributeIdentifier>,
    },
    #[serde(rename = "SessionHandler.RespondPin")]
    RespondPin {
        proceed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pin: Option<String>,
    },
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
