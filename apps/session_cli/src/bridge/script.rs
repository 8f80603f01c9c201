//! Script steps fed to the UI loop, one JSON object per line.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use session_core::Action;
use shared::{domain::AttributeIdentifier, protocol::HostEvent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Event pushed by the protocol engine or the credential manager.
    Host(HostEvent),
    /// Button press by the user.
    Act(Action),
    /// User picks a candidate for a disclosure group.
    Choose {
        group: usize,
        attribute: AttributeIdentifier,
    },
}

impl ScriptStep {
    pub fn name(&self) -> &'static str {
        match self {
            ScriptStep::Host(event) => event.kind(),
            ScriptStep::Act(action) => action.name(),
            ScriptStep::Choose { .. } => "choose_disclosure",
        }
    }
}

/// Blank lines and lines starting with `#` are skipped.
pub fn parse_script(raw: &str) -> anyhow::Result<Vec<ScriptStep>> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str::<ScriptStep>(line)
                .with_context(|| format!("invalid script step on line {}", index + 1))
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/script_tests.rs"]
mod tests;
