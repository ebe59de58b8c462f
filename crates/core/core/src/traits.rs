//! Core traits for Folio Analytics.
//!
//! `ReportProvider` is the seam between the aggregation layer and whatever
//! answers report queries: the Google Analytics Data API in production, an
//! in-memory script in tests.

use async_trait::async_trait;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::types::{MetricQuery, RawReportRow};

/// A source of raw report rows.
///
/// Each call is one outbound request. Implementations do not batch and do
/// not retry; the first failure is returned to the caller as-is.
#[async_trait]
pub trait ReportProvider: Send + Sync {
    /// Returns the provider name (e.g., "google-analytics").
    fn name(&self) -> &str;

    /// Runs a report over `query.date_range`.
    async fn run_report(&self, query: &MetricQuery) -> AnalyticsResult<Vec<RawReportRow>>;

    /// Runs a realtime report over `query.minute_range` (or the provider's
    /// default recent window when unset).
    async fn run_realtime_report(&self, query: &MetricQuery)
    -> AnalyticsResult<Vec<RawReportRow>>;
}

/// Provider used when no credentials are configured.
///
/// Every call fails with `MissingConfiguration`, so routes degrade exactly
/// as they would on an upstream failure.
#[derive(Debug, Clone)]
pub struct UnconfiguredProvider {
    missing: String,
}

impl UnconfiguredProvider {
    /// Creates a provider that reports `missing` as the absent setting.
    pub fn new(missing: impl Into<String>) -> Self {
        Self {
            missing: missing.into(),
        }
    }
}

#[async_trait]
impl ReportProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn run_report(&self, _query: &MetricQuery) -> AnalyticsResult<Vec<RawReportRow>> {
        Err(AnalyticsError::missing_config(&self.missing))
    }

    async fn run_realtime_report(
        &self,
        _query: &MetricQuery,
    ) -> AnalyticsResult<Vec<RawReportRow>> {
        Err(AnalyticsError::missing_config(&self.missing))
    }
}
