//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Whole seconds elapsed since another timestamp, clamped at zero.
    pub fn secs_since(&self, other: &Timestamp) -> u64 {
        self.0.signed_duration_since(other.0).num_seconds().max(0) as u64
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_unix(secs: i64) -> Timestamp {
        Timestamp::from_datetime(Utc.timestamp_opt(secs, 0).unwrap())
    }

    #[test]
    fn now_is_current_time() {
        let before = Timestamp::from_datetime(Utc::now());
        let ts = Timestamp::now();
        let after = Timestamp::from_datetime(Utc::now());

        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn secs_since_clamps_at_zero() {
        let earlier = at_unix(1_000);
        let later = at_unix(1_060);

        assert_eq!(later.secs_since(&earlier), 60);
        assert_eq!(earlier.secs_since(&later), 0);
    }

    #[test]
    fn serializes_transparently() {
        let ts = at_unix(1_700_000_000);
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }

    #[test]
    fn displays_as_rfc3339() {
        assert_eq!(at_unix(0).to_string(), "1970-01-01T00:00:00+00:00");
    }
}
