// Contest models
// The contest feed tags platforms with display names ("Codeforces"),
// start times as epoch millis or ISO strings, and durations in millis

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::utils::coerce;

/// A programming contest from one of the aggregated feeds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: u64,
    pub name: String,
    pub platform: String,
    pub start_time: Option<DateTime<Utc>>,
    pub duration_ms: u64,
    pub url: String,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl Contest {
    /// Decode one contest entry; non-objects are dropped entirely
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Some(Self {
            id: coerce::field_u64(value, "id"),
            name: coerce::field_str(value, "name"),
            platform: coerce::field_str(value, "platform"),
            start_time: parse_start_time(value.get("startTime")),
            duration_ms: coerce::field_u64(value, "duration"),
            url: coerce::field_str(value, "url"),
            description: coerce::opt_field_str(value, "description"),
            status: coerce::opt_field_str(value, "status"),
        })
    }
}

fn parse_start_time(raw: Option<&Value>) -> Option<DateTime<Utc>> {
    match raw? {
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                // Some feeds send local date-times without an offset
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        _ => None,
    }
}

/// Decode a contest list payload; anything that is not an array yields
/// an empty list
pub fn decode_contest_list(value: &Value) -> Vec<Contest> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Contest::from_value).collect())
        .unwrap_or_default()
}

/// Order contests by start time; undated contests sort last
pub fn sort_by_start(contests: &mut [Contest]) {
    contests.sort_by_key(|contest| {
        contest
            .start_time
            .map_or(i64::MAX, |start| start.timestamp_millis())
    });
}
