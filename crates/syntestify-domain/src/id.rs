//! Entity identifiers based on UUIDv7
//!
//! UUIDv7 provides chronological sortability, 128-bit uniqueness, and the
//! standard RFC 9562 textual format, with no coordination required between
//! writers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wrap an existing UUID (storage layer deserialization)
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> Uuid {
                self.0
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
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id! {
    /// Unique identifier for a project
    ProjectId
}

entity_id! {
    /// Unique identifier for a requirement
    RequirementId
}

entity_id! {
    /// Unique identifier for a test case
    TestCaseId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrips_through_string() {
        let id = RequirementId::new();
        let parsed: RequirementId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_invalid_id_string_rejected() {
        assert!("not-a-uuid".parse::<TestCaseId>().is_err());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ProjectId::new();
        let b = ProjectId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_v7_ids_sort_by_creation_order() {
        let a = TestCaseId::new();
        let b = TestCaseId::new();
        assert!(a <= b);
    }
}
