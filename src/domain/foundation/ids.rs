//! Strongly-typed identifier value objects.
//!
//! Every persisted entity gets its own UUID newtype so that an occurrence id
//! can never be handed to a lookup that expects a schedule id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a UUID-backed identifier with the standard constructors,
/// `Display`, and `FromStr`.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for an agreement between an organization and a location.
    AgreementId
);

uuid_id!(
    /// Unique identifier for a recurring pickup schedule.
    ScheduleId
);

uuid_id!(
    /// Unique identifier for one dated pickup occurrence.
    OccurrenceId
);

uuid_id!(
    /// Unique identifier for a per-occurrence report projection.
    ReportId
);

uuid_id!(
    /// Organization that collects at a pickup location.
    OrganizationId
);

uuid_id!(
    /// Pickup location.
    LocationId
);
