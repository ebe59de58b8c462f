//! Normalized report shapes returned to callers.

use serde::{Deserialize, Serialize};

/// One minute of the realtime activity chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    /// Wall-clock label, `H:MM`.
    pub name: String,
    pub value: u64,
    pub minutes_ago: u32,
}

/// Active users from one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryUsers {
    pub country: String,
    pub users: u64,
}

/// Active users from one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityUsers {
    pub city: String,
    pub users: u64,
}

/// Active users on one device category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCount {
    /// Display name, e.g. `Desktop`.
    pub name: String,
    pub value: u64,
    /// Lowercase category, e.g. `desktop`.
    pub device: String,
}

impl DeviceCount {
    /// Creates a device entry with the display name derived from `device`.
    pub fn new(device: &str, value: u64) -> Self {
        Self {
            name: capitalize(device),
            value,
            device: device.to_string(),
        }
    }
}

/// A labelled chart value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint<T = u64> {
    pub name: String,
    pub value: T,
}

impl<T> ChartPoint<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Page views of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageVisitors {
    pub name: String,
    pub visitors: u64,
}

/// A dashboard stat card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    /// Display value, already formatted.
    pub value: String,
    /// Change against the previous period. Always 0; no comparison is made.
    pub change_percent: i64,
    pub description: String,
}

impl StatCard {
    pub fn new(value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            change_percent: 0,
            description: description.into(),
        }
    }
}

/// Dashboard overview cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub visitors: StatCard,
    pub pageviews: StatCard,
    pub avg_session_duration: StatCard,
    pub bounce_rate: StatCard,
}

/// Body of the realtime `activeUsers` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeSummary {
    pub active_users: u64,
    pub new_users: u64,
    pub timeline: Vec<TimelinePoint>,
    #[serde(rename = "last30Min")]
    pub last_30_min: u64,
    #[serde(rename = "last5Min")]
    pub last_5_min: u64,
}

/// Body of the realtime `events` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTotals {
    pub total_events: u64,
    /// Key events.
    pub events: u64,
}

/// Uppercases the first character.
pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
