//! Core data types for Folio Analytics.
//!
//! Every type here is request-scoped: built when an inbound request arrives
//! and dropped when its response is written.

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Metrics the provider is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    ActiveUsers,
    NewUsers,
    EventCount,
    KeyEvents,
    ScreenPageViews,
    Sessions,
    UserEngagementDuration,
    BounceRate,
    EngagedSessions,
    TotalUsers,
    SessionsPerUser,
}

impl Metric {
    /// Returns the provider's name for this metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::ActiveUsers => "activeUsers",
            Metric::NewUsers => "newUsers",
            Metric::EventCount => "eventCount",
            Metric::KeyEvents => "keyEvents",
            Metric::ScreenPageViews => "screenPageViews",
            Metric::Sessions => "sessions",
            Metric::UserEngagementDuration => "userEngagementDuration",
            Metric::BounceRate => "bounceRate",
            Metric::EngagedSessions => "engagedSessions",
            Metric::TotalUsers => "totalUsers",
            Metric::SessionsPerUser => "sessionsPerUser",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dimensions rows can be broken down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    /// Minute offset from now, `"00"` being the current minute. Realtime only.
    MinutesAgo,
    Country,
    City,
    DeviceCategory,
    /// Calendar day as `YYYYMMDD`.
    Date,
    PagePath,
}

impl Dimension {
    /// Returns the provider's name for this dimension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::MinutesAgo => "minutesAgo",
            Dimension::Country => "country",
            Dimension::City => "city",
            Dimension::DeviceCategory => "deviceCategory",
            Dimension::Date => "date",
            Dimension::PagePath => "pagePath",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A date as the provider understands it: absolute or relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpec {
    Today,
    DaysAgo(u32),
    Date(NaiveDate),
}

impl DateSpec {
    /// Resolves to a calendar date, counting relative specs back from `today`.
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        match self {
            DateSpec::Today => today,
            DateSpec::DaysAgo(n) => today
                .checked_sub_days(Days::new(u64::from(*n)))
                .unwrap_or(NaiveDate::MIN),
            DateSpec::Date(date) => *date,
        }
    }
}

impl fmt::Display for DateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSpec::Today => f.write_str("today"),
            DateSpec::DaysAgo(n) => write!(f, "{n}daysAgo"),
            DateSpec::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for DateSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    #[serde(rename = "startDate")]
    pub start: DateSpec,
    #[serde(rename = "endDate")]
    pub end: DateSpec,
}

impl DateRange {
    /// Creates a range, rejecting one whose start resolves after its end.
    pub fn new(start: DateSpec, end: DateSpec) -> AnalyticsResult<Self> {
        let today = Utc::now().date_naive();
        if start.resolve(today) > end.resolve(today) {
            return Err(AnalyticsError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// The range covering only today.
    pub fn today() -> Self {
        Self {
            start: DateSpec::Today,
            end: DateSpec::Today,
        }
    }

    /// The range from `days` days ago up to and including today.
    pub fn last_days(days: u32) -> Self {
        Self {
            start: DateSpec::DaysAgo(days),
            end: DateSpec::Today,
        }
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::today()
    }
}

/// A window of recent minutes for realtime reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteRange {
    pub start_minutes_ago: u32,
    pub end_minutes_ago: u32,
}

impl MinuteRange {
    /// The most recent `minutes` minutes, including the current one.
    pub fn last(minutes: u32) -> AnalyticsResult<Self> {
        if minutes == 0 {
            return Err(AnalyticsError::invalid_parameter(
                "minutes",
                "window must be a positive number of minutes",
            ));
        }
        Ok(Self {
            start_minutes_ago: minutes - 1,
            end_minutes_ago: 0,
        })
    }

    /// Number of minutes covered by the window; at least 1.
    pub fn minutes(&self) -> u32 {
        self.start_minutes_ago - self.end_minutes_ago + 1
    }
}

/// Sort key for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Metric { metric: Metric, desc: bool },
    Dimension { dimension: Dimension, desc: bool },
}

/// One report request against the metrics provider.
///
/// Column `i` of every returned row's metric values belongs to `metrics[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub metrics: Vec<Metric>,
    pub dimensions: Vec<Dimension>,
    pub date_range: DateRange,
    /// Realtime window; only realtime reports read it.
    pub minute_range: Option<MinuteRange>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u32>,
}

impl MetricQuery {
    /// Creates a query for a single metric over `date_range`.
    pub fn new(metric: Metric, date_range: DateRange) -> Self {
        Self {
            metrics: vec![metric],
            dimensions: Vec::new(),
            date_range,
            minute_range: None,
            order_by: None,
            limit: None,
        }
    }

    /// Creates a query for a realtime report.
    pub fn realtime(metric: Metric) -> Self {
        Self::new(metric, DateRange::today())
    }

    /// Adds another metric column.
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Adds a dimension.
    pub fn dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Restricts a realtime report to a minute window.
    pub fn within(mut self, minute_range: MinuteRange) -> Self {
        self.minute_range = Some(minute_range);
        self
    }

    /// Sorts by a metric.
    pub fn order_by_metric(mut self, metric: Metric, desc: bool) -> Self {
        self.order_by = Some(OrderBy::Metric { metric, desc });
        self
    }

    /// Sorts by a dimension.
    pub fn order_by_dimension(mut self, dimension: Dimension, desc: bool) -> Self {
        self.order_by = Some(OrderBy::Dimension { dimension, desc });
        self
    }

    /// Caps the number of rows.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A report row exactly as the provider returned it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReportRow {
    pub dimension_values: Vec<String>,
    pub metric_values: Vec<String>,
}

impl RawReportRow {
    /// Creates a row from dimension and metric values.
    pub fn new<D, M>(dimensions: D, metrics: M) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            dimension_values: dimensions.into_iter().map(Into::into).collect(),
            metric_values: metrics.into_iter().map(Into::into).collect(),
        }
    }

    /// Gets a dimension value by column.
    pub fn dimension(&self, index: usize) -> Option<&str> {
        self.dimension_values.get(index).map(String::as_str)
    }

    /// Gets a metric value by column.
    pub fn metric(&self, index: usize) -> Option<&str> {
        self.metric_values.get(index).map(String::as_str)
    }
}
