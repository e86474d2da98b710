use chrono::{SecondsFormat, Utc};

/// Current UTC time as ISO-8601 with a `Z` suffix
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
