//! Request and response bodies of the Analytics Data API.

use folio_core::{DateRange, Dimension, Metric, MetricQuery, MinuteRange, OrderBy, RawReportRow};
use serde::{Deserialize, Serialize};

/// Grant type for exchanging a signed assertion.
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Debug, Serialize)]
pub(crate) struct NameRef {
    name: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetricOrderBody {
    metric_name: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DimensionOrderBody {
    dimension_name: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderByBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    metric: Option<MetricOrderBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimension: Option<DimensionOrderBody>,
    desc: bool,
}

impl From<OrderBy> for OrderByBody {
    fn from(order: OrderBy) -> Self {
        match order {
            OrderBy::Metric { metric, desc } => Self {
                metric: Some(MetricOrderBody {
                    metric_name: metric.as_str(),
                }),
                dimension: None,
                desc,
            },
            OrderBy::Dimension { dimension, desc } => Self {
                metric: None,
                dimension: Some(DimensionOrderBody {
                    dimension_name: dimension.as_str(),
                }),
                desc,
            },
        }
    }
}

fn names<T: Copy>(items: &[T], name: fn(&T) -> &'static str) -> Vec<NameRef> {
    items.iter().map(|item| NameRef { name: name(item) }).collect()
}

/// Body of `properties/{id}:runReport`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunReportRequest {
    date_ranges: Vec<DateRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dimensions: Vec<NameRef>,
    metrics: Vec<NameRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    order_bys: Vec<OrderByBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

impl From<&MetricQuery> for RunReportRequest {
    fn from(query: &MetricQuery) -> Self {
        Self {
            date_ranges: vec![query.date_range],
            dimensions: names(&query.dimensions, Dimension::as_str),
            metrics: names(&query.metrics, Metric::as_str),
            order_bys: query.order_by.map(OrderByBody::from).into_iter().collect(),
            limit: query.limit,
        }
    }
}

/// Body of `properties/{id}:runRealtimeReport`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunRealtimeReportRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dimensions: Vec<NameRef>,
    metrics: Vec<NameRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    minute_ranges: Vec<MinuteRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    order_bys: Vec<OrderByBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

impl From<&MetricQuery> for RunRealtimeReportRequest {
    fn from(query: &MetricQuery) -> Self {
        Self {
            dimensions: names(&query.dimensions, Dimension::as_str),
            metrics: names(&query.metrics, Metric::as_str),
            minute_ranges: query.minute_range.into_iter().collect(),
            order_bys: query.order_by.map(OrderByBody::from).into_iter().collect(),
            limit: query.limit,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ApiValue {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRow {
    #[serde(default)]
    dimension_values: Vec<ApiValue>,
    #[serde(default)]
    metric_values: Vec<ApiValue>,
}

/// Report response; the provider omits `rows` entirely when there is no data.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReportResponse {
    #[serde(default)]
    rows: Vec<ApiRow>,
}

impl ReportResponse {
    /// Flattens the nested value objects into raw rows.
    pub(crate) fn into_rows(self) -> Vec<RawReportRow> {
        fn flatten(values: Vec<ApiValue>) -> Vec<String> {
            values
                .into_iter()
                .map(|v| v.value.unwrap_or_default())
                .collect()
        }

        self.rows
            .into_iter()
            .map(|row| RawReportRow {
                dimension_values: flatten(row.dimension_values),
                metric_values: flatten(row.metric_values),
            })
            .collect()
    }
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
