use std::sync::{OnceLock, PoisonError, RwLock};

use serde::Serialize;
use shared::domain::{AttributeIdentifier, CredentialRecord, DisclosureGroup};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CredentialSnapshot {
    pub credentials: Vec<CredentialRecord>,
    pub loaded: bool,
}

/// In-memory cache of the credentials known to the disclosure engine.
/// Replaced wholesale on every load, never merged.
#[derive(Debug, Default)]
pub struct CredentialStore {
    inner: RwLock<CredentialSnapshot>,
}

static GLOBAL_STORE: OnceLock<CredentialStore> = OnceLock::new();

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide store shared by every session.
    pub fn global() -> &'static CredentialStore {
        GLOBAL_STORE.get_or_init(CredentialStore::new)
    }

    pub fn load(&self, credentials: Vec<CredentialRecord>) {
        let count = credentials.len();
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *state = CredentialSnapshot {
            credentials,
            loaded: true,
        };
        info!(count, "credential store reloaded");
    }

    pub fn snapshot(&self) -> CredentialSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loaded
    }

    /// Candidates of `group` that are backed by at least one stored credential.
    pub fn candidates_for(&self, group: &DisclosureGroup) -> Vec<AttributeIdentifier> {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        group
            .candidates()
            .iter()
            .filter(|candidate| {
                state
                    .credentials
                    .iter()
                    .any(|credential| credential.provides(candidate))
            })
            .cloned()
            .collect()
    }

    /// Disclosure groups none of whose candidates can be satisfied.
    pub fn unsatisfiable_groups(&self, to_disclose: &[DisclosureGroup]) -> Vec<usize> {
        to_disclose
            .iter()
            .enumerate()
            .filter(|(_, group)| self.candidates_for(group).is_empty())
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/credential_store_tests.rs"]
mod tests;
