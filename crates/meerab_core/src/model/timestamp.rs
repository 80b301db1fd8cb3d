//! Creation timestamps: stored as epoch milliseconds, rendered as RFC 3339.

use chrono::{SecondsFormat, TimeZone, Utc};

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Renders epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn to_rfc3339(epoch_ms: i64) -> Option<String> {
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Serde adapter for `createdAt` fields.
pub mod rfc3339 {
    use super::to_rfc3339;
    use chrono::DateTime;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(epoch_ms: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        let text = to_rfc3339(*epoch_ms)
            .ok_or_else(|| S::Error::custom(format!("timestamp {epoch_ms} out of range")))?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.timestamp_millis())
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::to_rfc3339;

    #[test]
    fn renders_millisecond_precision_utc() {
        assert_eq!(
            to_rfc3339(1_700_000_000_123).as_deref(),
            Some("2023-11-14T22:13:20.123Z")
        );
    }
}
