//! Read-time visibility of logically expired entries.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::error::TtlMapCoreError;

/// Decides whether readers can observe entries that are past their
/// deadline but have not been swept yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadPolicy {
    /// Expiration is enforced only by the sweeper. An expired entry stays
    /// visible (and counted) until the next sweep tick removes it.
    #[default]
    Sweep,
    /// Reads check the deadline themselves. Expired entries are hidden from
    /// lookups, counts and snapshots even before they are swept.
    Strict,
}

impl ReadPolicy {
    pub fn is_visible<V>(self, entry: &Entry<V>, now: Instant) -> bool {
        match self {
            ReadPolicy::Sweep => true,
            ReadPolicy::Strict => !entry.is_expired_at(now),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReadPolicy::Sweep => "sweep",
            ReadPolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for ReadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadPolicy {
    type Err = TtlMapCoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sweep" => Ok(ReadPolicy::Sweep),
            "strict" => Ok(ReadPolicy::Strict),
            _ => Err(TtlMapCoreError::InvalidReadPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_is_sweep() {
        assert_eq!(ReadPolicy::default(), ReadPolicy::Sweep);
    }

    #[test]
    fn test_sweep_shows_expired_entries() {
        let now = Instant::now();
        let entry = Entry::new("v", now, Duration::from_secs(1));
        assert!(ReadPolicy::Sweep.is_visible(&entry, now + Duration::from_secs(5)));
    }

    #[test]
    fn test_strict_hides_expired_entries() {
        let now = Instant::now();
        let entry = Entry::new("v", now, Duration::from_secs(1));

        assert!(ReadPolicy::Strict.is_visible(&entry, now));
        assert!(!ReadPolicy::Strict.is_visible(&entry, now + Duration::from_secs(1)));
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("sweep".parse::<ReadPolicy>().unwrap(), ReadPolicy::Sweep);
        assert_eq!(" Strict ".parse::<ReadPolicy>().unwrap(), ReadPolicy::Strict);
        assert!(matches!(
            "lazy".parse::<ReadPolicy>(),
            Err(TtlMapCoreError::InvalidReadPolicy(s)) if s == "lazy"
        ));
    }

    #[test]
    fn test_display_matches_parse() {
        for policy in [ReadPolicy::Sweep, ReadPolicy::Strict] {
            assert_eq!(policy.to_string().parse::<ReadPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ReadPolicy::Strict).unwrap();
        assert_eq!(json, "\"strict\"");

        let parsed: ReadPolicy = serde_json::from_str("\"sweep\"").unwrap();
        assert_eq!(parsed, ReadPolicy::Sweep);
    }
}
