//! Type-safe identifier wrappers around opaque backend strings.
//!
//! The backend hands out identifiers it owns (UUID text for matches,
//! free-form slugs like `demo_agent_1` for agents), so ids are kept as
//! strings rather than parsed. Separate newtypes stop an agent id from
//! being passed where a match id is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of characters shown by `short()` in log lines.
const SHORT_LEN: usize = 8;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Create a fresh identifier from a random UUID v4.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Borrow the identifier text.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Leading characters of the identifier, for compact logs.
            pub fn short(&self) -> &str {
                let end = self
                    .0
                    .char_indices()
                    .nth(SHORT_LEN)
                    .map_or(self.0.len(), |(idx, _)| idx);
                self.0.get(..end).unwrap_or(&self.0)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

define_id! {
    /// Identifier of a combatant agent.
    AgentId
}

define_id! {
    /// Identifier of a match (battle) between two agents.
    MatchId
}
