//! Request routing: maps a query type and parameters to a response body.

use folio_core::{AnalyticsError, AnalyticsResult, ReportProvider};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::extract;
use crate::service::{AnalyticsService, DEFAULT_TIMELINE_MINUTES};
use crate::shapes::{ChartPoint, DeviceCount, EventTotals, RealtimeSummary};

/// Default number of rows for country and city breakdowns.
pub const DEFAULT_GEOGRAPHY_LIMIT: usize = 10;

/// Default number of rows for the top pages table.
pub const DEFAULT_TOP_PAGES_LIMIT: usize = 5;

/// Default number of days for dashboard time series.
pub const DEFAULT_DAYS: u32 = 7;

/// Query types served by the realtime endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealtimeQuery {
    ActiveUsers,
    Events,
    Countries,
    Cities,
    Devices,
}

impl RealtimeQuery {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActiveUsers => "activeUsers",
            Self::Events => "events",
            Self::Countries => "countries",
            Self::Cities => "cities",
            Self::Devices => "devices",
        }
    }
}

impl FromStr for RealtimeQuery {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activeUsers" => Ok(Self::ActiveUsers),
            "events" => Ok(Self::Events),
            "countries" => Ok(Self::Countries),
            "cities" => Ok(Self::Cities),
            "devices" => Ok(Self::Devices),
            other => Err(AnalyticsError::unknown_type(other)),
        }
    }
}

impl fmt::Display for RealtimeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query types served by the dashboard endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardQuery {
    Overview,
    PageViews,
    TopPages,
    Devices,
    BounceRate,
}

impl DashboardQuery {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::PageViews => "pageViews",
            Self::TopPages => "topPages",
            Self::Devices => "devices",
            Self::BounceRate => "bounceRate",
        }
    }
}

impl FromStr for DashboardQuery {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overview" => Ok(Self::Overview),
            "pageViews" => Ok(Self::PageViews),
            "topPages" => Ok(Self::TopPages),
            "devices" => Ok(Self::Devices),
            "bounceRate" => Ok(Self::BounceRate),
            other => Err(AnalyticsError::unknown_type(other)),
        }
    }
}

impl fmt::Display for DashboardQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed `limit` and `days` parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub limit: Option<usize>,
    pub days: Option<u32>,
}

impl QueryParams {
    /// Parses raw parameter values. Absent values stay unset.
    pub fn parse(limit: Option<&str>, days: Option<&str>) -> AnalyticsResult<Self> {
        let limit = limit
            .map(|raw| match raw.trim().parse::<usize>() {
                Ok(0) | Err(_) => Err(AnalyticsError::invalid_parameter(
                    "limit",
                    format!("expected a positive integer, got '{raw}'"),
                )),
                Ok(limit) => Ok(limit),
            })
            .transpose()?;

        let days = days
            .map(|raw| {
                raw.trim().parse::<u32>().map_err(|_| {
                    AnalyticsError::invalid_parameter(
                        "days",
                        format!("expected a non-negative integer, got '{raw}'"),
                    )
                })
            })
            .transpose()?;

        Ok(Self { limit, days })
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    fn limit_or(&self, default: usize) -> usize {
        self.limit.unwrap_or(default)
    }

    fn days_or(&self, default: u32) -> u32 {
        self.days.unwrap_or(default)
    }
}

fn to_body<T: Serialize>(value: T) -> AnalyticsResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Dispatches analytics requests to the service.
#[derive(Clone)]
pub struct AnalyticsRouter {
    service: AnalyticsService,
}

impl AnalyticsRouter {
    /// Creates a router over an existing service.
    pub fn new(service: AnalyticsService) -> Self {
        Self { service }
    }

    /// Creates a router and service over a provider.
    pub fn from_provider(provider: Arc<dyn ReportProvider>) -> Self {
        Self::new(AnalyticsService::new(provider))
    }

    /// Returns the service.
    pub fn service(&self) -> &AnalyticsService {
        &self.service
    }

    /// Handles a realtime request. A missing type is an unknown type.
    pub async fn handle(&self, kind: Option<&str>, params: &QueryParams) -> AnalyticsResult<Value> {
        let query: RealtimeQuery = kind.unwrap_or_default().parse()?;
        tracing::info!(query = %query, "Handling realtime analytics request");

        let result = self.realtime(query, params).await;
        if let Err(e) = &result {
            tracing::error!(query = %query, error = %e, "Realtime analytics request failed");
        }
        result
    }

    async fn realtime(&self, query: RealtimeQuery, params: &QueryParams) -> AnalyticsResult<Value> {
        match query {
            RealtimeQuery::ActiveUsers => to_body(self.realtime_summary().await?),
            RealtimeQuery::Events => to_body(EventTotals {
                total_events: self.service.event_count(1).await?,
                events: self.service.key_event_count(1).await?,
            }),
            RealtimeQuery::Countries => to_body(
                self.service
                    .users_by_country(params.limit_or(DEFAULT_GEOGRAPHY_LIMIT))
                    .await?,
            ),
            RealtimeQuery::Cities => to_body(
                self.service
                    .users_by_city(params.limit_or(DEFAULT_GEOGRAPHY_LIMIT))
                    .await?,
            ),
            RealtimeQuery::Devices => to_body(self.service.device_categories().await?),
        }
    }

    /// Issues the five realtime calls in order; the first failure ends the chain.
    async fn realtime_summary(&self) -> AnalyticsResult<RealtimeSummary> {
        let active_users = self.service.active_users().await?;
        let last_5_min = self.service.active_users_in_window(5).await?;
        let last_30_min = self.service.active_users_in_window(30).await?;
        let new_users = self.service.new_users(1).await?;
        let timeline = self
            .service
            .active_users_per_minute(DEFAULT_TIMELINE_MINUTES)
            .await?;

        tracing::debug!(
            active_users,
            last_5_min,
            last_30_min,
            new_users,
            timeline_points = timeline.len(),
            "Realtime summary assembled"
        );

        Ok(RealtimeSummary {
            active_users,
            new_users,
            timeline,
            last_30_min,
            last_5_min,
        })
    }

    /// Handles a dashboard request. A missing type is an unknown type.
    pub async fn handle_dashboard(
        &self,
        kind: Option<&str>,
        params: &QueryParams,
    ) -> AnalyticsResult<Value> {
        let query: DashboardQuery = kind.unwrap_or_default().parse()?;
        tracing::info!(query = %query, "Handling dashboard analytics request");

        let result = self.dashboard(query, params).await;
        if let Err(e) = &result {
            tracing::error!(query = %query, error = %e, "Dashboard analytics request failed");
        }
        result
    }

    async fn dashboard(&self, query: DashboardQuery, params: &QueryParams) -> AnalyticsResult<Value> {
        match query {
            DashboardQuery::Overview => to_body(self.service.overview().await?),
            DashboardQuery::PageViews => to_body(
                self.service
                    .page_views_over_time(params.days_or(DEFAULT_DAYS))
                    .await?,
            ),
            DashboardQuery::TopPages => to_body(
                self.service
                    .top_pages(params.limit_or(DEFAULT_TOP_PAGES_LIMIT))
                    .await?,
            ),
            DashboardQuery::Devices => {
                let devices = self.service.device_categories().await?;
                let points: Vec<ChartPoint<u64>> = devices
                    .into_iter()
                    .map(|device| ChartPoint::new(device.name, device.value))
                    .collect();
                to_body(points)
            }
            DashboardQuery::BounceRate => to_body(
                self.service
                    .bounce_rate_over_time(params.days_or(DEFAULT_DAYS))
                    .await?,
            ),
        }
    }

    /// Device breakdown, or the all-zero breakdown if the provider fails.
    pub async fn devices_or_fallback(&self) -> [DeviceCount; 3] {
        match self.service.device_categories().await {
            Ok(devices) => devices,
            Err(e) => {
                tracing::warn!(error = %e, "Device breakdown unavailable, returning zeros");
                extract::empty_devices()
            }
        }
    }
}
