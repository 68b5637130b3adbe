//! Identifier types for timetable records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} identifier: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    reason: &'static str,
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, trimming surrounding whitespace.
            ///
            /// Empty (or all-whitespace) input is rejected.
            pub fn parse(s: &str) -> Result<Self, InvalidId> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(InvalidId {
                        kind: $kind,
                        reason: "must not be empty",
                    });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidId;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identity of a physical stop (`stop_id`).
    StopId,
    "stop"
);

string_id!(
    /// Identity of one scheduled vehicle run (`trip_id`).
    ///
    /// Ordering is lexical, which is the order trips sort in within a
    /// route group of the schedule index.
    TripId,
    "trip"
);

string_id!(
    /// A labelled bus line, e.g. `"30"` or `"201"`.
    RouteId,
    "route"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let id = RouteId::parse("  30 ").unwrap();
        assert_eq!(id.as_str(), "30");
    }

    #[test]
    fn reject_empty() {
        assert!(StopId::parse("").is_err());
        assert!(TripId::parse("   ").is_err());
    }

    #[test]
    fn error_names_kind() {
        let err = TripId::parse("").unwrap_err();
        assert_eq!(err.to_string(), "invalid trip identifier: must not be empty");
    }

    #[test]
    fn debug_and_display() {
        let id = TripId::parse("T1").unwrap();
        assert_eq!(format!("{id}"), "T1");
        assert_eq!(format!("{id:?}"), "TripId(T1)");
    }

    #[test]
    fn trip_ids_order_lexically() {
        let mut ids = vec![
            TripId::parse("b").unwrap(),
            TripId::parse("a10").unwrap(),
            TripId::parse("a2").unwrap(),
        ];
        ids.sort();
        let as_str: Vec<_> = ids.iter().map(TripId::as_str).collect();
        assert_eq!(as_str, vec!["a10", "a2", "b"]);
    }

    #[test]
    fn serde_uses_plain_strings() {
        let id: StopId = serde_json::from_str("\"1234\"").unwrap();
        assert_eq!(id.as_str(), "1234");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1234\"");
    }

    #[test]
    fn serde_rejects_empty() {
        assert!(serde_json::from_str::<RouteId>("\"\"").is_err());
    }
}
