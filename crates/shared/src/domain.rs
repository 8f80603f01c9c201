use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(SchemeManagerId);
id_newtype!(CredentialId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    RequestPermission,
    RequestDisclosurePermission,
    RequestPin,
    Success,
    Failure,
    Cancelled,
    UnsatisfiableRequest,
    MissingKeyshareEnrollment,
}

impl SessionStatus {
    pub const ALL: [SessionStatus; 8] = [
        SessionStatus::RequestPermission,
        SessionStatus::RequestDisclosurePermission,
        SessionStatus::RequestPin,
        SessionStatus::Success,
        SessionStatus::Failure,
        SessionStatus::Cancelled,
        SessionStatus::UnsatisfiableRequest,
        SessionStatus::MissingKeyshareEnrollment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::RequestPermission => "requestPermission",
            SessionStatus::RequestDisclosurePermission => "requestDisclosurePermission",
            SessionStatus::RequestPin => "requestPin",
            SessionStatus::Success => "success",
            SessionStatus::Failure => "failure",
            SessionStatus::Cancelled => "cancelled",
            SessionStatus::UnsatisfiableRequest => "unsatisfiableRequest",
            SessionStatus::MissingKeyshareEnrollment => "missingKeyshareEnrollment",
        }
    }

    /// Statuses that wait for an accept/decline (or PIN) answer from the user.
    pub fn awaits_response(self) -> bool {
        matches!(
            self,
            SessionStatus::RequestPermission
                | SessionStatus::RequestDisclosurePermission
                | SessionStatus::RequestPin
        )
    }

    pub fn is_terminal(self) -> bool {
        !self.awaits_response()
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = SessionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        SessionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .ok_or_else(|| SessionError::UnknownStatus(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrmaAction {
    #[default]
    Disclosing,
    Issuing,
    Signing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Text,
    #[serde(alias = "jpg")]
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeIdentifier {
    #[serde(rename = "type")]
    pub attribute_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_hash: Option<String>,
}

impl AttributeIdentifier {
    pub fn new(attribute_type: impl Into<String>) -> Self {
        Self {
            attribute_type: attribute_type.into(),
            credential_hash: None,
        }
    }

    pub fn with_credential_hash(mut self, hash: impl Into<String>) -> Self {
        self.credential_hash = Some(hash.into());
        self
    }

    /// Credential type of the attribute, i.e. the identifier minus its last segment.
    pub fn credential_type(&self) -> &str {
        self.attribute_type
            .rsplit_once('.')
            .map(|(credential, _)| credential)
            .unwrap_or(&self.attribute_type)
    }
}

/// One disjunction of a disclosure request: any single candidate satisfies it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisclosureGroup(pub Vec<AttributeIdentifier>);

impl DisclosureGroup {
    pub fn candidates(&self) -> &[AttributeIdentifier] {
        &self.0
    }

    pub fn first(&self) -> Option<&AttributeIdentifier> {
        self.0.first()
    }

    pub fn contains(&self, attribute: &AttributeIdentifier) -> bool {
        self.0.iter().any(|candidate| candidate == attribute)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub id: CredentialId,
    /// Fully qualified credential type, e.g. `irma-demo.MijnOverheid.root`.
    pub credential_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl CredentialRecord {
    /// Whether this credential can back the given attribute in a disclosure.
    pub fn provides(&self, attribute: &AttributeIdentifier) -> bool {
        if attribute.credential_type() != self.credential_type {
            return false;
        }
        match (&attribute.credential_hash, &self.hash) {
            (Some(wanted), Some(have)) => wanted == have,
            _ => true,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
