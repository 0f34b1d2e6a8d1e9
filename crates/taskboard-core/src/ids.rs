//! Integer entity IDs, one newtype per entity.
//!
//! The task service hands out integer primary keys for every entity. Each
//! entity gets a distinct newtype so a project ID can never be passed where a
//! user ID is expected.
//!
//! Form inputs carry IDs as strings; [`std::str::FromStr`] performs the
//! string-to-integer coercion and rejects anything that is not a plain
//! integer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a form value is not a valid integer ID.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid id: {0:?}")]
pub struct ParseIdError(pub String);

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw integer ID.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Return the raw integer value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| ParseIdError(s.to_string()))
            }
        }
    };
}

branded_id!(
    /// Identifier of a user account.
    UserId
);

branded_id!(
    /// Identifier of a project.
    ProjectId
);

branded_id!(
    /// Identifier of a task.
    TaskId
);

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
