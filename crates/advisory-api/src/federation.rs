use advisory_domain::{CredentialFederator, FederatedCredentials, FederationError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Delegated role identifier for a target account. The role name is the
/// same well-known name propagated into every account; only the account id
/// varies.
pub fn role_arn(account_id: &str, role_name: &str) -> String {
    format!("arn:aws:iam::{}:role/{}", account_id, role_name)
}

/// Credential federator backed by the organization's identity federation
/// endpoint. Exchanges a delegated role identifier for short-lived scoped
/// credentials.
pub struct HttpCredentialFederator {
    http: reqwest::Client,
    broker_url: String,
    session_name: String,
}

#[derive(Serialize)]
struct FederateRequest<'a> {
    role_arn: &'a str,
    session_name: &'a str,
}

#[derive(Deserialize)]
struct FederateResponse {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expires_at: DateTime<Utc>,
}

impl HttpCredentialFederator {
    pub fn new(
        broker_url: String,
        session_name: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            broker_url,
            session_name,
        })
    }
}

#[async_trait]
impl CredentialFederator for HttpCredentialFederator {
    // Credentials must never reach the logs; only the role identifier and
    // expiry are loggable.
    #[instrument(skip(self))]
    async fn federate(
        &self,
        account_id: &str,
        role_name: &str,
    ) -> Result<FederatedCredentials, FederationError> {
        let arn = role_arn(account_id, role_name);

        let response = self
            .http
            .post(format!("{}/federate", self.broker_url))
            .json(&FederateRequest {
                role_arn: &arn,
                session_name: &self.session_name,
            })
            .send()
            .await
            .map_err(|e| FederationError::BrokerUnavailable(e.into()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::FORBIDDEN => {
                return Err(FederationError::TrustDenied { role_arn: arn });
            }
            StatusCode::NOT_FOUND => {
                return Err(FederationError::AccountNotFound(account_id.to_string()));
            }
            status => {
                return Err(FederationError::BrokerUnavailable(anyhow::anyhow!(
                    "credential broker returned status {}",
                    status
                )));
            }
        }

        let grant: FederateResponse = response
            .json()
            .await
            .map_err(|e| FederationError::BrokerUnavailable(e.into()))?;

        debug!(
            account_id = %account_id,
            expires_at = %grant.expires_at,
            "federated credentials issued"
        );

        Ok(FederatedCredentials {
            access_key_id: grant.access_key_id,
            secret_access_key: grant.secret_access_key,
            session_token: grant.session_token,
            expires_at: grant.expires_at,
        })
    }
}
