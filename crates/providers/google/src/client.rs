//! Google Analytics Data API client.

use async_trait::async_trait;
use folio_core::{AnalyticsError, AnalyticsResult, MetricQuery, RawReportRow, ReportProvider};
use folio_jwt::{ASSERTION_TTL, AssertionClaims, AssertionSigner};
use reqwest::Client;
use serde::Serialize;

use crate::config::GoogleAnalyticsConfig;
use crate::wire::{
    JWT_BEARER_GRANT, ReportResponse, RunRealtimeReportRequest, RunReportRequest, TokenResponse,
};

fn http_error(err: reqwest::Error) -> AnalyticsError {
    if err.is_decode() {
        AnalyticsError::Decode {
            message: err.to_string(),
        }
    } else {
        AnalyticsError::Http {
            message: err.to_string(),
        }
    }
}

/// Report provider backed by the Google Analytics Data API.
///
/// Every report call signs a fresh assertion and exchanges it for a bearer
/// token before issuing the report request; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct GoogleAnalyticsClient {
    config: GoogleAnalyticsConfig,
    signer: AssertionSigner,
    http_client: Client,
}

impl GoogleAnalyticsClient {
    const RUN_REPORT: &'static str = "runReport";
    const RUN_REALTIME_REPORT: &'static str = "runRealtimeReport";

    /// Creates a client; fails if a credential is missing or the key is unusable.
    pub fn new(config: GoogleAnalyticsConfig) -> AnalyticsResult<Self> {
        config.validate()?;

        let mut signer =
            AssertionSigner::rs256(&config.private_key).map_err(|e| AnalyticsError::Signing {
                message: e.to_string(),
            })?;
        if let Some(key_id) = &config.private_key_id {
            signer = signer.with_key_id(key_id);
        }

        Ok(Self {
            config,
            signer,
            http_client: Client::new(),
        })
    }

    /// Replaces the HTTP client (timeouts, proxies).
    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Returns the configuration this client was built from.
    pub fn config(&self) -> &GoogleAnalyticsConfig {
        &self.config
    }

    /// Exchanges a freshly signed assertion for a bearer token.
    async fn access_token(&self) -> AnalyticsResult<String> {
        let claims = AssertionClaims::new(
            &self.config.client_email,
            &self.config.token_url,
            ASSERTION_TTL,
        );
        let assertion = self
            .signer
            .sign(&claims)
            .map_err(|e| AnalyticsError::Signing {
                message: e.to_string(),
            })?;

        let params = [
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Failed to get access token");
            return Err(AnalyticsError::token_exchange(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response.json().await.map_err(http_error)?;
        tracing::debug!(expires_in = ?token.expires_in, "Obtained provider access token");
        Ok(token.access_token)
    }

    async fn post_report<B: Serialize>(
        &self,
        method: &str,
        body: &B,
    ) -> AnalyticsResult<Vec<RawReportRow>> {
        let access_token = self.access_token().await?;
        let url = self.config.report_url(method);

        tracing::debug!(
            property = %self.config.property_id,
            %url,
            "Sending analytics report request"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&access_token)
            .json(body)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                property = %self.config.property_id,
                body = %error_text,
                "Analytics API error"
            );
            return Err(AnalyticsError::upstream(status.as_u16(), error_text));
        }

        let report: ReportResponse = response.json().await.map_err(http_error)?;
        let rows = report.into_rows();

        if rows.is_empty() {
            tracing::debug!(
                property = %self.config.property_id,
                method,
                "No rows returned; normal for new properties or quiet ranges"
            );
        } else {
            tracing::debug!(row_count = rows.len(), method, "Analytics report received");
        }

        Ok(rows)
    }
}

#[async_trait]
impl ReportProvider for GoogleAnalyticsClient {
    fn name(&self) -> &str {
        "google-analytics"
    }

    async fn run_report(&self, query: &MetricQuery) -> AnalyticsResult<Vec<RawReportRow>> {
        self.post_report(Self::RUN_REPORT, &RunReportRequest::from(query))
            .await
    }

    async fn run_realtime_report(
        &self,
        query: &MetricQuery,
    ) -> AnalyticsResult<Vec<RawReportRow>> {
        self.post_report(
            Self::RUN_REALTIME_REPORT,
            &RunRealtimeReportRequest::from(query),
        )
        .await
    }
}
