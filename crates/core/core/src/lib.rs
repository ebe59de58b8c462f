//! # Folio Analytics Core
//!
//! This crate provides the foundational types and traits shared by every
//! Folio Analytics crate: report queries and rows, the error type, and the
//! `ReportProvider` trait that provider clients implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate root
pub use error::{AnalyticsError, AnalyticsResult};
pub use traits::{ReportProvider, UnconfiguredProvider};
pub use types::{
    DateRange, DateSpec, Dimension, Metric, MetricQuery, MinuteRange, OrderBy, RawReportRow,
};
