//! Plan identifiers
//!
//! Plan IDs are opaque UUIDs assigned by the store at creation. They are
//! shown in a short form (`plan-1a2b3c4d`), and users may refer to a plan by
//! that form, by the full UUID, or by a UUID prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const DISPLAY_PREFIX: &str = "plan-";

/// Shortest bare UUID prefix accepted as a plan reference
const MIN_PREFIX_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(Uuid);

impl PlanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Whether a user-supplied reference names this plan
    pub fn matches(&self, reference: &str) -> bool {
        let reference = reference.trim();
        if reference.eq_ignore_ascii_case(&self.to_string()) {
            return true;
        }
        let bare = reference.strip_prefix(DISPLAY_PREFIX).unwrap_or(reference);
        bare.len() >= MIN_PREFIX_LEN && self.0.to_string().starts_with(&bare.to_ascii_lowercase())
    }
}

impl Default for PlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let uuid = self.0.to_string();
        write!(f, "{}{}", DISPLAY_PREFIX, &uuid[..8])
    }
}

/// Parses a full UUID, with or without the `plan-` prefix
impl FromStr for PlanId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bare = s.strip_prefix(DISPLAY_PREFIX).unwrap_or(s);
        Uuid::parse_str(bare).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_new_ids_differ() {
        let a = PlanId::new();
        assert!(!a.as_uuid().is_nil());
        assert_ne!(a, PlanId::new());
    }

    #[test]
    fn test_short_display() {
        let id: PlanId = SAMPLE.parse().unwrap();
        assert_eq!(id.to_string(), "plan-550e8400");
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let id: PlanId = SAMPLE.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", SAMPLE));

        let back: PlanId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_from_str_accepts_prefixed_uuid() {
        let plain: PlanId = SAMPLE.parse().unwrap();
        let prefixed: PlanId = format!("plan-{}", SAMPLE).parse().unwrap();
        assert_eq!(plain, prefixed);
        assert!("plan-550e8400".parse::<PlanId>().is_err());
    }

    #[test]
    fn test_matches_reference() {
        let id: PlanId = SAMPLE.parse().unwrap();
        assert!(id.matches("plan-550e8400"));
        assert!(id.matches("PLAN-550E8400"));
        assert!(id.matches("550e"));
        assert!(id.matches(SAMPLE));
        assert!(!id.matches("55"));
        assert!(!id.matches("plan-deadbeef"));
    }
}
