//! # Folio Analytics
//!
//! Turns provider reports into dashboard data.
//!
//! - [`extract`]: pure functions from raw report rows to normalized shapes.
//! - [`AnalyticsService`]: one provider query and one extractor per metric.
//! - [`AnalyticsRouter`]: maps a query type and parameters to a JSON body.
//!
//! ## Example
//!
//! ```rust,ignore
//! use folio_analytics::{AnalyticsRouter, QueryParams};
//!
//! let router = AnalyticsRouter::from_provider(provider);
//! let body = router.handle(Some("countries"), &QueryParams::default()).await?;
//! ```

pub mod extract;
mod router;
mod service;
mod shapes;

pub use router::*;
pub use service::*;
pub use shapes::*;
