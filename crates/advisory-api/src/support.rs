use advisory_domain::{
    AdvisorySource, CheckDescriptor, CheckStatus, CheckSummary, FederatedCredentials,
    RetrievalError,
};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Advisory check API client. All requests are scoped to one account via
/// the federated credentials passed per call; the client itself holds no
/// account state.
pub struct HttpAdvisorySource {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct CheckCatalogResponse {
    checks: Vec<CheckEntry>,
}

#[derive(Deserialize)]
struct CheckEntry {
    id: String,
    name: String,
    category: String,
}

#[derive(Serialize)]
struct SummariesRequest<'a> {
    check_ids: &'a [String],
}

#[derive(Deserialize)]
struct SummariesResponse {
    summaries: Vec<SummaryEntry>,
}

#[derive(Deserialize)]
struct SummaryEntry {
    check_id: String,
    status: CheckStatus,
    category_specific_summary: Option<CategorySpecificSummary>,
}

#[derive(Deserialize)]
struct CategorySpecificSummary {
    cost_optimizing: Option<CostOptimizingSummary>,
}

#[derive(Deserialize)]
struct CostOptimizingSummary {
    estimated_monthly_savings: Decimal,
}

impl HttpAdvisorySource {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    fn authorize(
        request: RequestBuilder,
        credentials: &FederatedCredentials,
    ) -> RequestBuilder {
        request
            .header("x-access-key-id", &credentials.access_key_id)
            .header("x-secret-access-key", &credentials.secret_access_key)
            .header("x-session-token", &credentials.session_token)
    }

    fn map_status(status: StatusCode) -> RetrievalError {
        match status {
            // The advisory API rejects accounts whose support tier does not
            // include programmatic check access
            StatusCode::PAYMENT_REQUIRED | StatusCode::FORBIDDEN => RetrievalError::UnsupportedTier,
            status => RetrievalError::ApiUnavailable(anyhow::anyhow!(
                "advisory api returned status {}",
                status
            )),
        }
    }
}

#[async_trait]
impl AdvisorySource for HttpAdvisorySource {
    async fn list_checks(
        &self,
        credentials: &FederatedCredentials,
    ) -> Result<Vec<CheckDescriptor>, RetrievalError> {
        let request = self
            .http
            .get(format!("{}/checks", self.base_url))
            .query(&[("language", "en")]);

        let response = Self::authorize(request, credentials)
            .send()
            .await
            .map_err(|e| RetrievalError::ApiUnavailable(e.into()))?;

        if !response.status().is_success() {
            return Err(Self::map_status(response.status()));
        }

        let catalog: CheckCatalogResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::ApiUnavailable(e.into()))?;

        debug!(check_count = catalog.checks.len(), "retrieved check catalog");

        Ok(catalog
            .checks
            .into_iter()
            .map(|entry| CheckDescriptor {
                id: entry.id,
                name: entry.name,
                category: entry.category,
            })
            .collect())
    }

    async fn check_summaries(
        &self,
        credentials: &FederatedCredentials,
        check_ids: &[String],
    ) -> Result<Vec<CheckSummary>, RetrievalError> {
        let request = self
            .http
            .post(format!("{}/check-summaries", self.base_url))
            .json(&SummariesRequest { check_ids });

        let response = Self::authorize(request, credentials)
            .send()
            .await
            .map_err(|e| RetrievalError::ApiUnavailable(e.into()))?;

        if !response.status().is_success() {
            return Err(Self::map_status(response.status()));
        }

        let summaries: SummariesResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::ApiUnavailable(e.into()))?;

        Ok(summaries
            .summaries
            .into_iter()
            .map(|entry| {
                let estimated_monthly_savings = entry
                    .category_specific_summary
                    .and_then(|summary| summary.cost_optimizing)
                    .map(|cost| cost.estimated_monthly_savings);
                CheckSummary {
                    check_id: entry.check_id,
                    status: entry.status,
                    estimated_monthly_savings,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn credentials() -> FederatedCredentials {
        FederatedCredentials {
            access_key_id: "AKIATEST".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: "token".to_string(),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
        }
    }

    fn source(server: &MockServer) -> HttpAdvisorySource {
        HttpAdvisorySource::new(server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_list_checks_sends_scoped_credentials() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/checks")
                    .query_param("language", "en")
                    .header("x-access-key-id", "AKIATEST")
                    .header("x-session-token", "token");
                then.status(200).json_body(json!({
                    "checks": [
                        {"id": "c1", "name": "Idle Instances", "category": "cost_optimizing"},
                        {"id": "c2", "name": "Open Security Groups", "category": "security"},
                    ]
                }));
            })
            .await;

        let checks = source(&server).list_checks(&credentials()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].id, "c1");
        assert_eq!(checks[1].category, "security");
    }

    #[tokio::test]
    async fn test_check_summaries_maps_cost_summary() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/check-summaries")
                    .json_body(json!({"check_ids": ["c1", "c2"]}));
                then.status(200).json_body(json!({
                    "summaries": [
                        {
                            "check_id": "c1",
                            "status": "warning",
                            "category_specific_summary": {
                                "cost_optimizing": {"estimated_monthly_savings": "20.50"}
                            }
                        },
                        {
                            "check_id": "c2",
                            "status": "ok"
                        },
                    ]
                }));
            })
            .await;

        let summaries = source(&server)
            .check_summaries(&credentials(), &["c1".to_string(), "c2".to_string()])
            .await
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].status, CheckStatus::Warning);
        assert_eq!(
            summaries[0].estimated_monthly_savings,
            Some(Decimal::new(2050, 2))
        );
        // No cost summary at all is distinct from a zero estimate
        assert_eq!(summaries[1].estimated_monthly_savings, None);
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_unsupported_tier() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/checks");
                then.status(403);
            })
            .await;

        let result = source(&server).list_checks(&credentials()).await;

        assert!(matches!(result, Err(RetrievalError::UnsupportedTier)));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/check-summaries");
                then.status(500);
            })
            .await;

        let result = source(&server)
            .check_summaries(&credentials(), &["c1".to_string()])
            .await;

        assert!(matches!(result, Err(RetrievalError::ApiUnavailable(_))));
    }
}
