//! Typed IDs for goals and ledger entries.
//!
//! The host owns goal IDs; Weekclose only mints IDs for recovery debts it
//! creates and for the ledger entries it writes.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// An ID string the host sent that is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} id {input:?}")]
pub struct IdError {
    /// What the ID was for.
    pub kind: &'static str,
    /// The rejected text.
    pub input: String,
}

macro_rules! typed_id {
    ($name:ident, $kind:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Mints a time-ordered ID, so ledger entries sort by creation.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|_| IdError {
                    kind: $kind,
                    input: s.to_string(),
                })
            }
        }
    };
}

typed_id!(GoalId, "goal", "A savings goal or the recovery debt.");
typed_id!(LedgerEntryId, "ledger entry", "A synthetic transaction ledger entry.");
