//! Type-safe identifier wrapper for agents.
//!
//! Robot identifiers come from scenario files (`device_id`) or from the
//! fleet generator, so they are free-form strings rather than UUIDs. The
//! newtype keeps them from being mixed with other strings such as color
//! names or file paths.

use serde::{Deserialize, Serialize};

/// Unique, stable identifier for an agent in the fleet.
///
/// Equality, ordering, and hashing use the string value only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the single-character grid label for this identifier.
    ///
    /// The label is the first character, uppercased. An empty identifier
    /// (rejected by the scenario loader, but representable) yields `'?'`.
    pub fn label(&self) -> char {
        self.0
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?')
    }
}

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for AgentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
