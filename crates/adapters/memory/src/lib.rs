//! # Folio Memory Provider
//!
//! An in-memory report provider for Folio Analytics, primarily intended
//! for testing and development purposes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_provider_memory::{MemoryProvider, ReportKey};
//!
//! let provider = MemoryProvider::new()
//!     .with_rows(ReportKey::core(Metric::ActiveUsers).dimension(Dimension::Country), rows)
//!     .fail_on_call(3);
//! ```

use async_trait::async_trait;
use folio_core::{
    AnalyticsError, AnalyticsResult, Dimension, Metric, MetricQuery, RawReportRow, ReportProvider,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Which report method a call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Core,
    Realtime,
}

/// Identifies a scripted report by the shape of the query that asks for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportKey {
    kind: ReportKind,
    metrics: Vec<Metric>,
    dimensions: Vec<Dimension>,
    window: Option<u32>,
}

impl ReportKey {
    /// Key for a core report of `metric`.
    pub fn core(metric: Metric) -> Self {
        Self {
            kind: ReportKind::Core,
            metrics: vec![metric],
            dimensions: Vec::new(),
            window: None,
        }
    }

    /// Key for a realtime report of `metric`.
    pub fn realtime(metric: Metric) -> Self {
        Self {
            kind: ReportKind::Realtime,
            ..Self::core(metric)
        }
    }

    /// Adds a metric column.
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Adds a dimension.
    pub fn dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Only matches realtime queries over exactly `minutes` minutes.
    pub fn window(mut self, minutes: u32) -> Self {
        self.window = Some(minutes);
        self
    }

    fn for_query(kind: ReportKind, query: &MetricQuery) -> Self {
        Self {
            kind,
            metrics: query.metrics.clone(),
            dimensions: query.dimensions.clone(),
            window: query.minute_range.map(|range| range.minutes()),
        }
    }

    fn without_window(&self) -> Self {
        Self {
            window: None,
            ..self.clone()
        }
    }
}

/// A call the provider received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub kind: ReportKind,
    pub query: MetricQuery,
}

/// In-memory report provider.
///
/// Answers each query with the rows scripted for its `ReportKey` (a key
/// without a window matches any window), or with no rows when nothing was
/// scripted. Clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    reports: HashMap<ReportKey, Vec<RawReportRow>>,
    fail_on: Option<usize>,
    fail_all: bool,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
}

impl MemoryProvider {
    /// Creates a provider that returns no rows for every query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the rows returned for `key`.
    pub fn with_rows(mut self, key: ReportKey, rows: Vec<RawReportRow>) -> Self {
        self.reports.insert(key, rows);
        self
    }

    /// Makes the `n`th call (1-based) fail with an upstream error.
    pub fn fail_on_call(mut self, n: usize) -> Self {
        self.fail_on = Some(n);
        self
    }

    /// Makes every call fail with an upstream error.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Returns every call received so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Returns the number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Forgets recorded calls.
    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }

    async fn answer(
        &self,
        kind: ReportKind,
        query: &MetricQuery,
    ) -> AnalyticsResult<Vec<RawReportRow>> {
        let call_number = {
            let mut calls = self.calls.write().await;
            calls.push(RecordedCall {
                kind,
                query: query.clone(),
            });
            calls.len()
        };

        if self.fail_all || self.fail_on == Some(call_number) {
            return Err(AnalyticsError::upstream(
                503,
                format!("scripted failure on call {call_number}"),
            ));
        }

        let key = ReportKey::for_query(kind, query);
        let rows = self
            .reports
            .get(&key)
            .or_else(|| self.reports.get(&key.without_window()))
            .cloned()
            .unwrap_or_default();
        Ok(rows)
    }
}

#[async_trait]
impl ReportProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn run_report(&self, query: &MetricQuery) -> AnalyticsResult<Vec<RawReportRow>> {
        self.answer(ReportKind::Core, query).await
    }

    async fn run_realtime_report(
        &self,
        query: &MetricQuery,
    ) -> AnalyticsResult<Vec<RawReportRow>> {
        self.answer(ReportKind::Realtime, query).await
    }
}
