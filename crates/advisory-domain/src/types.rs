use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One account to collect advisory data from.
/// Produced by the directory, carried unchanged through the work queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub account_id: String,
    pub account_label: String,
}

/// Short-lived credentials scoped to one account and one invocation.
///
/// Never persisted and never logged; the Debug implementation redacts
/// everything except the expiry.
#[derive(Clone)]
pub struct FederatedCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for FederatedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FederatedCredentials")
            .field("access_key_id", &"<redacted>")
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// One entry of the advisory check catalog for an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckDescriptor {
    pub id: String,
    pub name: String,
    pub category: String,
}

/// Evaluated state of a single check. Checks the advisory source has not
/// evaluated (or cannot evaluate for the account's support tier) carry no
/// summary and are recorded as `NotAvailable` downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    pub check_id: String,
    pub status: CheckStatus,
    pub estimated_monthly_savings: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
    NotAvailable,
}

/// One archived row: the state of one advisory check for one account on one
/// day. Field order is the archive column order.
///
/// `estimated_monthly_savings` keeps the source's decimal precision; `None`
/// means the check reported no estimate, which is distinct from a zero
/// estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub date: NaiveDate,
    pub account_id: String,
    pub status: CheckStatus,
    pub check_id: String,
    pub check_name: String,
    pub estimated_monthly_savings: Option<Decimal>,
    pub account_name: String,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_credentials() {
        let credentials = FederatedCredentials {
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "super-secret".to_string(),
            session_token: "session-token".to_string(),
            expires_at: Utc::now(),
        };

        let rendered = format!("{:?}", credentials);

        assert!(!rendered.contains("AKIAEXAMPLE"));
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("session-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
