//! Analytics service: one provider query and one extractor per metric.

use chrono::Local;
use folio_core::{
    AnalyticsResult, DateRange, DateSpec, Dimension, Metric, MetricQuery, MinuteRange, ReportProvider,
};
use std::sync::Arc;

use crate::extract;
use crate::shapes::{
    ChartPoint, CityUsers, CountryUsers, DeviceCount, OverviewStats, PageVisitors, TimelinePoint,
};

/// Minutes covered by the per-minute activity chart.
pub const DEFAULT_TIMELINE_MINUTES: u32 = 30;

/// Days covered by the geography, device and top-page breakdowns.
pub const BREAKDOWN_DAYS: u32 = 30;

/// Days covered by the overview cards.
pub const OVERVIEW_DAYS: u32 = 7;

/// The range from `days` days ago through today.
fn trailing_days(days: u32) -> AnalyticsResult<DateRange> {
    DateRange::new(DateSpec::DaysAgo(days), DateSpec::Today)
}

/// Issues report queries against a provider and normalizes the results.
#[derive(Clone)]
pub struct AnalyticsService {
    provider: Arc<dyn ReportProvider>,
}

impl AnalyticsService {
    /// Creates a new analytics service.
    pub fn new(provider: Arc<dyn ReportProvider>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Users active right now, over the provider's default realtime window.
    pub async fn active_users(&self) -> AnalyticsResult<u64> {
        let query = MetricQuery::realtime(Metric::ActiveUsers);
        let rows = self.provider.run_realtime_report(&query).await?;
        Ok(extract::active_users(&rows))
    }

    /// Users active within the last `minutes` minutes.
    pub async fn active_users_in_window(&self, minutes: u32) -> AnalyticsResult<u64> {
        let query = MetricQuery::realtime(Metric::ActiveUsers).within(MinuteRange::last(minutes)?);
        let rows = self.provider.run_realtime_report(&query).await?;
        Ok(extract::active_users(&rows))
    }

    /// Active users for each of the last `window` minutes, oldest first.
    pub async fn active_users_per_minute(&self, window: u32) -> AnalyticsResult<Vec<TimelinePoint>> {
        let query = MetricQuery::realtime(Metric::ActiveUsers)
            .dimension(Dimension::MinutesAgo)
            .within(MinuteRange::last(window)?)
            .order_by_dimension(Dimension::MinutesAgo, false);
        let rows = self.provider.run_realtime_report(&query).await?;
        Ok(extract::active_users_per_minute(
            &rows,
            window,
            Local::now().time(),
        ))
    }

    /// New users over the last `days` days.
    pub async fn new_users(&self, days: u32) -> AnalyticsResult<u64> {
        let query = MetricQuery::new(Metric::NewUsers, trailing_days(days)?);
        let rows = self.provider.run_report(&query).await?;
        Ok(extract::new_users(&rows))
    }

    /// Events over the last `days` days.
    pub async fn event_count(&self, days: u32) -> AnalyticsResult<u64> {
        let query = MetricQuery::new(Metric::EventCount, trailing_days(days)?);
        let rows = self.provider.run_report(&query).await?;
        Ok(extract::event_count(&rows))
    }

    /// Key events over the last `days` days.
    pub async fn key_event_count(&self, days: u32) -> AnalyticsResult<u64> {
        let query = MetricQuery::new(Metric::KeyEvents, trailing_days(days)?);
        let rows = self.provider.run_report(&query).await?;
        Ok(extract::key_event_count(&rows))
    }

    fn breakdown(dimension: Dimension, limit: usize) -> MetricQuery {
        MetricQuery::new(Metric::ActiveUsers, DateRange::last_days(BREAKDOWN_DAYS))
            .dimension(dimension)
            .order_by_metric(Metric::ActiveUsers, true)
            .limit(u32::try_from(limit).unwrap_or(u32::MAX))
    }

    /// Top countries by active users.
    pub async fn users_by_country(&self, limit: usize) -> AnalyticsResult<Vec<CountryUsers>> {
        let rows = self
            .provider
            .run_report(&Self::breakdown(Dimension::Country, limit))
            .await?;
        Ok(extract::users_by_country(&rows, limit))
    }

    /// Top cities by active users.
    pub async fn users_by_city(&self, limit: usize) -> AnalyticsResult<Vec<CityUsers>> {
        let rows = self
            .provider
            .run_report(&Self::breakdown(Dimension::City, limit))
            .await?;
        Ok(extract::users_by_city(&rows, limit))
    }

    /// Active users per device category.
    pub async fn device_categories(&self) -> AnalyticsResult<[DeviceCount; 3]> {
        let query = MetricQuery::new(Metric::ActiveUsers, DateRange::last_days(BREAKDOWN_DAYS))
            .dimension(Dimension::DeviceCategory)
            .order_by_metric(Metric::ActiveUsers, true);
        let rows = self.provider.run_report(&query).await?;
        Ok(extract::device_categories(&rows))
    }

    /// Overview cards for the last week.
    pub async fn overview(&self) -> AnalyticsResult<OverviewStats> {
        let [first, rest @ ..] = extract::OVERVIEW_METRICS;
        let query = rest.into_iter().fold(
            MetricQuery::new(first, DateRange::last_days(OVERVIEW_DAYS)),
            MetricQuery::metric,
        );
        let rows = self.provider.run_report(&query).await?;
        Ok(extract::overview(&rows))
    }

    /// Page views per day over the last `days` days.
    pub async fn page_views_over_time(&self, days: u32) -> AnalyticsResult<Vec<ChartPoint<u64>>> {
        let query = MetricQuery::new(Metric::ScreenPageViews, trailing_days(days)?)
            .dimension(Dimension::Date)
            .order_by_dimension(Dimension::Date, false);
        let rows = self.provider.run_report(&query).await?;
        Ok(extract::page_views_over_time(&rows))
    }

    /// Most viewed pages.
    pub async fn top_pages(&self, limit: usize) -> AnalyticsResult<Vec<PageVisitors>> {
        let query = MetricQuery::new(Metric::ScreenPageViews, DateRange::last_days(BREAKDOWN_DAYS))
            .dimension(Dimension::PagePath)
            .order_by_metric(Metric::ScreenPageViews, true)
            .limit(u32::try_from(limit).unwrap_or(u32::MAX));
        let rows = self.provider.run_report(&query).await?;
        let mut pages = extract::top_pages(&rows);
        pages.truncate(limit);
        Ok(pages)
    }

    /// Bounce rate per day over the last `days` days.
    pub async fn bounce_rate_over_time(&self, days: u32) -> AnalyticsResult<Vec<ChartPoint<f64>>> {
        let query = MetricQuery::new(Metric::BounceRate, trailing_days(days)?)
            .dimension(Dimension::Date)
            .order_by_dimension(Dimension::Date, false);
        let rows = self.provider.run_report(&query).await?;
        Ok(extract::bounce_rate_over_time(&rows))
    }
}
