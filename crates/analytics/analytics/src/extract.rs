//! Pure extractors turning raw report rows into normalized shapes.
//!
//! Extractors never fail. Values the provider reports as `""`, `"NaN"` or
//! anything else that is not a non-negative number count as zero, so a
//! quiet property and a garbled response look the same to callers.

use chrono::{Duration, NaiveDate, NaiveTime};
use folio_core::{Metric, RawReportRow};
use std::collections::HashMap;

use crate::shapes::{
    ChartPoint, CityUsers, CountryUsers, DeviceCount, OverviewStats, PageVisitors, StatCard,
    TimelinePoint, capitalize,
};

/// Label for rows whose grouping dimension is empty.
pub const UNKNOWN: &str = "Unknown";

/// Device categories in the order they are always reported.
pub const DEVICE_CATEGORIES: [&str; 3] = ["desktop", "mobile", "tablet"];

/// Metrics requested for the overview cards, in column order.
pub const OVERVIEW_METRICS: [Metric; 4] = [
    Metric::ActiveUsers,
    Metric::ScreenPageViews,
    Metric::UserEngagementDuration,
    Metric::BounceRate,
];

/// Parses a count metric value.
///
/// Integers parse directly and finite non-negative decimals truncate toward
/// zero. Everything else is 0.
pub fn parse_count(raw: &str) -> u64 {
    let raw = raw.trim();
    if let Ok(count) = raw.parse::<u64>() {
        return count;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value.trunc() as u64,
        _ => 0,
    }
}

/// Parses a fractional metric value; same policy as [`parse_count`].
pub fn parse_ratio(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

fn count_at(row: &RawReportRow, column: usize) -> u64 {
    parse_count(row.metric(column).unwrap_or_default())
}

fn sum_column(rows: &[RawReportRow], column: usize) -> u64 {
    rows.iter()
        .map(|row| count_at(row, column))
        .fold(0, u64::saturating_add)
}

/// Total active users.
pub fn active_users(rows: &[RawReportRow]) -> u64 {
    sum_column(rows, 0)
}

/// Total events.
pub fn event_count(rows: &[RawReportRow]) -> u64 {
    sum_column(rows, 0)
}

/// Total key events.
pub fn key_event_count(rows: &[RawReportRow]) -> u64 {
    sum_column(rows, 0)
}

/// Total new users.
pub fn new_users(rows: &[RawReportRow]) -> u64 {
    sum_column(rows, 0)
}

fn minute_label(now: NaiveTime, minutes_ago: u32) -> String {
    (now - Duration::minutes(i64::from(minutes_ago)))
        .format("%-H:%M")
        .to_string()
}

/// Builds the per-minute activity series for the last `window` minutes.
///
/// Rows are keyed by the `minutesAgo` dimension. The result has exactly
/// `window` points, oldest first, labelled with the wall-clock minute
/// relative to `now`.
pub fn active_users_per_minute(
    rows: &[RawReportRow],
    window: u32,
    now: NaiveTime,
) -> Vec<TimelinePoint> {
    let mut counts = vec![0u64; window as usize];

    for row in rows {
        let Some(minutes_ago) = row
            .dimension(0)
            .and_then(|raw| raw.trim().parse::<usize>().ok())
        else {
            continue;
        };
        if let Some(slot) = counts.get_mut(minutes_ago) {
            *slot = slot.saturating_add(count_at(row, 0));
        }
    }

    (0..window)
        .rev()
        .map(|minutes_ago| TimelinePoint {
            name: minute_label(now, minutes_ago),
            value: counts[minutes_ago as usize],
            minutes_ago,
        })
        .collect()
}

/// Sums metric column 0 per value of dimension 0, in first-seen order.
fn sum_by_dimension(rows: &[RawReportRow]) -> Vec<(String, u64)> {
    let mut groups: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let key = match row.dimension(0).map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => UNKNOWN.to_string(),
        };
        let value = count_at(row, 0);

        match index.get(&key) {
            Some(&i) => groups[i].1 = groups[i].1.saturating_add(value),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, value));
            }
        }
    }

    groups
}

fn top_groups(rows: &[RawReportRow], limit: usize) -> Vec<(String, u64)> {
    let mut groups = sum_by_dimension(rows);
    // Stable: ties keep first-seen order.
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups.truncate(limit);
    groups
}

/// Users per country, largest first.
pub fn users_by_country(rows: &[RawReportRow], limit: usize) -> Vec<CountryUsers> {
    top_groups(rows, limit)
        .into_iter()
        .map(|(country, users)| CountryUsers { country, users })
        .collect()
}

/// Users per city, largest first.
pub fn users_by_city(rows: &[RawReportRow], limit: usize) -> Vec<CityUsers> {
    top_groups(rows, limit)
        .into_iter()
        .map(|(city, users)| CityUsers { city, users })
        .collect()
}

/// Users per device category: always desktop, mobile, tablet.
pub fn device_categories(rows: &[RawReportRow]) -> [DeviceCount; 3] {
    let mut counts = [0u64; 3];

    for row in rows {
        let category = row.dimension(0).unwrap_or_default().trim().to_lowercase();
        if let Some(i) = DEVICE_CATEGORIES.iter().position(|c| *c == category) {
            counts[i] = counts[i].saturating_add(count_at(row, 0));
        }
    }

    std::array::from_fn(|i| DeviceCount::new(DEVICE_CATEGORIES[i], counts[i]))
}

/// The all-zero device breakdown.
pub fn empty_devices() -> [DeviceCount; 3] {
    device_categories(&[])
}

fn with_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

/// Overview cards from one row of [`OVERVIEW_METRICS`].
pub fn overview(rows: &[RawReportRow]) -> OverviewStats {
    let empty = RawReportRow::default();
    let row = rows.first().unwrap_or(&empty);

    let engagement_secs = count_at(row, 2);
    let bounce_rate = parse_ratio(row.metric(3).unwrap_or_default()) * 100.0;

    OverviewStats {
        visitors: StatCard::new(
            with_thousands(count_at(row, 0)),
            "Total visitors this month",
        ),
        pageviews: StatCard::new(
            with_thousands(count_at(row, 1)),
            "Total pageviews this month",
        ),
        avg_session_duration: StatCard::new(
            format!("{}:{:02}", engagement_secs / 60, engagement_secs % 60),
            "Average time on site",
        ),
        bounce_rate: StatCard::new(
            format!("{bounce_rate:.1}%"),
            "Visitors who leave after viewing only one page",
        ),
    }
}

/// Formats a `YYYYMMDD` date as `Mon D`; anything else is returned as is.
fn day_label(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map(|date| date.format("%b %-d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Page views per day, in provider order.
pub fn page_views_over_time(rows: &[RawReportRow]) -> Vec<ChartPoint<u64>> {
    rows.iter()
        .map(|row| ChartPoint::new(day_label(row.dimension(0).unwrap_or_default()), count_at(row, 0)))
        .collect()
}

/// Turns a page path into a page title: `/blog/my-post?x=1` is `My post`.
pub fn page_title(path: &str) -> String {
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    match path.split('/').filter(|segment| !segment.is_empty()).next_back() {
        Some(segment) => capitalize(&segment.replace('-', " ")),
        None => "Home".to_string(),
    }
}

/// Page views per page, in provider order.
pub fn top_pages(rows: &[RawReportRow]) -> Vec<PageVisitors> {
    rows.iter()
        .map(|row| PageVisitors {
            name: page_title(row.dimension(0).unwrap_or_default()),
            visitors: count_at(row, 0),
        })
        .collect()
}

/// Bounce rate per day as a percentage with one decimal.
pub fn bounce_rate_over_time(rows: &[RawReportRow]) -> Vec<ChartPoint<f64>> {
    rows.iter()
        .map(|row| {
            let percent = parse_ratio(row.metric(0).unwrap_or_default()) * 100.0;
            ChartPoint::new(
                day_label(row.dimension(0).unwrap_or_default()),
                (percent * 10.0).round() / 10.0,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(dimension: &str, metric: &str) -> RawReportRow {
        RawReportRow::new([dimension], [metric])
    }

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count(" 7 "), 7);
        assert_eq!(parse_count("12.9"), 12);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("NaN"), 0);
        assert_eq!(parse_count("inf"), 0);
        assert_eq!(parse_count("-3"), 0);
        assert_eq!(parse_count("lots"), 0);
    }

    #[test]
    fn test_parse_ratio() {
        assert_eq!(parse_ratio("0.25"), 0.25);
        assert_eq!(parse_ratio("NaN"), 0.0);
        assert_eq!(parse_ratio("-0.5"), 0.0);
        assert_eq!(parse_ratio(""), 0.0);
    }

    #[test]
    fn test_active_users_sums_rows() {
        assert_eq!(active_users(&[]), 0);
        assert_eq!(active_users(&[row("", "4"), row("", "NaN"), row("", "3")]), 7);
    }

    #[test]
    fn test_users_by_country_groups_and_ranks() {
        let rows = vec![
            row("US", "50"),
            row("CA", "30"),
            row("US", "20"),
            row("FR", "10"),
        ];
        assert_eq!(
            users_by_country(&rows, 3),
            vec![
                CountryUsers { country: "US".into(), users: 70 },
                CountryUsers { country: "CA".into(), users: 30 },
                CountryUsers { country: "FR".into(), users: 10 },
            ]
        );
    }

    #[test]
    fn test_users_by_city_ties_keep_first_seen_order() {
        let rows = vec![row("Oslo", "5"), row("", "5"), row("Lima", "9")];
        let cities = users_by_city(&rows, 10);
        let names: Vec<_> = cities.iter().map(|c| c.city.as_str()).collect();
        assert_eq!(names, ["Lima", "Oslo", UNKNOWN]);
    }

    #[test]
    fn test_device_categories_always_three() {
        let rows = vec![
            row("MOBILE", "4"),
            row("smart tv", "100"),
            row("desktop", "2"),
            row("Mobile", "1"),
        ];
        let devices = device_categories(&rows);
        assert_eq!(devices[0], DeviceCount::new("desktop", 2));
        assert_eq!(devices[1], DeviceCount::new("mobile", 5));
        assert_eq!(devices[2], DeviceCount::new("tablet", 0));
        assert_eq!(devices[0].name, "Desktop");

        let empty = empty_devices();
        assert!(empty.iter().all(|d| d.value == 0));
        assert_eq!(empty[2].device, "tablet");
    }

    #[test]
    fn test_per_minute_series_is_gap_free() {
        let rows = vec![row("00", "3"), row("02", "1"), row("02", "1"), row("45", "9"), row("x", "9")];
        let timeline = active_users_per_minute(&rows, 5, at(10, 30));

        assert_eq!(timeline.len(), 5);
        let minutes: Vec<u32> = timeline.iter().map(|p| p.minutes_ago).collect();
        assert_eq!(minutes, [4, 3, 2, 1, 0]);
        let values: Vec<u64> = timeline.iter().map(|p| p.value).collect();
        assert_eq!(values, [0, 0, 2, 0, 3]);
        assert_eq!(timeline[0].name, "10:26");
        assert_eq!(timeline[4].name, "10:30");
    }

    #[test]
    fn test_per_minute_labels_wrap_midnight() {
        let timeline = active_users_per_minute(&[], 3, at(0, 1));
        let labels: Vec<&str> = timeline.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(labels, ["23:59", "0:00", "0:01"]);
    }

    #[test]
    fn test_overview_formats_cards() {
        let rows = vec![RawReportRow::new(
            Vec::<String>::new(),
            ["1234567", "8900", "125.7", "0.4567"],
        )];
        let stats = overview(&rows);
        assert_eq!(stats.visitors.value, "1,234,567");
        assert_eq!(stats.pageviews.value, "8,900");
        assert_eq!(stats.avg_session_duration.value, "2:05");
        assert_eq!(stats.bounce_rate.value, "45.7%");
        assert_eq!(stats.visitors.change_percent, 0);
    }

    #[test]
    fn test_overview_without_rows_is_zero() {
        let stats = overview(&[]);
        assert_eq!(stats.visitors.value, "0");
        assert_eq!(stats.avg_session_duration.value, "0:00");
        assert_eq!(stats.bounce_rate.value, "0.0%");
    }

    #[test]
    fn test_with_thousands() {
        assert_eq!(with_thousands(0), "0");
        assert_eq!(with_thousands(999), "999");
        assert_eq!(with_thousands(1000), "1,000");
        assert_eq!(with_thousands(123456), "123,456");
    }

    #[test]
    fn test_page_views_over_time_labels_days() {
        let points = page_views_over_time(&[row("20240305", "12"), row("garbage", "1")]);
        assert_eq!(points[0], ChartPoint::new("Mar 5", 12));
        assert_eq!(points[1].name, "garbage");
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title("/"), "Home");
        assert_eq!(page_title(""), "Home");
        assert_eq!(page_title("/?utm_source=x"), "Home");
        assert_eq!(page_title("/blog/my-first-post/"), "My first post");
        assert_eq!(page_title("/pricing?plan=pro"), "Pricing");
    }

    #[test]
    fn test_bounce_rate_rounds_to_one_decimal() {
        let points = bounce_rate_over_time(&[row("20240101", "0.41234"), row("20240102", "NaN")]);
        assert_eq!(points[0], ChartPoint::new("Jan 1", 41.2));
        assert_eq!(points[1].value, 0.0);
    }
}
