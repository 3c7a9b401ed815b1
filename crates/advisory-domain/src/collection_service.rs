use crate::clock::Clock;
use crate::error::{CollectError, RetrievalError};
use crate::ports::{AdvisorySource, ArchiveStore, CredentialFederator};
use crate::report;
use crate::types::{AccountRef, CheckDescriptor, CheckResult, CheckStatus, CheckSummary};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Archive key for one (date, account) pair. A pure function of its inputs
/// so that same-day reprocessing lands on the same object.
pub fn archive_key(date: NaiveDate, account_label: &str) -> String {
    format!("{}/{}.csv", date.format("%Y-%m-%d"), account_label)
}

/// Terminal outcome of a successful collection invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectOutcome {
    /// An object for this (date, account) already exists; duplicate
    /// delivery was short-circuited without re-collection.
    AlreadyArchived,
    Collected {
        rows: usize,
    },
}

/// Per-account collection service, invoked once per delivered work item.
///
/// Flow:
/// 1. Short-circuit if today's object for the account already exists
/// 2. Federate short-lived credentials for the account
/// 3. Retrieve the check catalog, then per-check summaries
/// 4. Normalize into one row per catalog check
/// 5. Encode and upload the whole object in a single call
///
/// The service is stateless and fully independent across accounts; any
/// error leaves the work item unacknowledged for queue redelivery. The
/// upload is all-or-nothing, so a half-written object cannot exist.
pub struct CollectionService {
    federator: Arc<dyn CredentialFederator>,
    source: Arc<dyn AdvisorySource>,
    archive: Arc<dyn ArchiveStore>,
    clock: Arc<dyn Clock>,
    role_name: String,
}

impl CollectionService {
    pub fn new(
        federator: Arc<dyn CredentialFederator>,
        source: Arc<dyn AdvisorySource>,
        archive: Arc<dyn ArchiveStore>,
        clock: Arc<dyn Clock>,
        role_name: String,
    ) -> Self {
        Self {
            federator,
            source,
            archive,
            clock,
            role_name,
        }
    }

    pub async fn collect(&self, account: &AccountRef) -> Result<CollectOutcome, CollectError> {
        let date = self.clock.today();
        let key = archive_key(date, &account.account_label);

        debug!(
            account_id = %account.account_id,
            key = %key,
            "starting advisory collection"
        );

        // The queue is at-least-once; a duplicate delivery for an account
        // that already has today's object is acknowledged without rework.
        if self.archive.exists(&key).await? {
            info!(
                account_id = %account.account_id,
                key = %key,
                "account already archived for this date"
            );
            return Ok(CollectOutcome::AlreadyArchived);
        }

        // Credentials live for the duration of this invocation only
        let credentials = self
            .federator
            .federate(&account.account_id, &self.role_name)
            .await?;

        let checks = self.source.list_checks(&credentials).await?;
        debug!(
            account_id = %account.account_id,
            check_count = checks.len(),
            "retrieved check catalog"
        );

        let check_ids: Vec<String> = checks.iter().map(|check| check.id.clone()).collect();
        let summaries = match self.source.check_summaries(&credentials, &check_ids).await {
            Ok(summaries) => summaries,
            // A tier that cannot evaluate the checks still gets its full
            // row set, all NotAvailable, so per-account row counts stay
            // comparable across accounts and over time.
            Err(RetrievalError::UnsupportedTier) => {
                warn!(
                    account_id = %account.account_id,
                    "support tier does not expose check summaries, recording all checks as not_available"
                );
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let rows = normalize(date, account, &checks, &summaries);

        let content = report::encode(&rows).map_err(CollectError::Encode)?;
        self.archive.upload(&key, content.into()).await?;

        info!(
            account_id = %account.account_id,
            account_label = %account.account_label,
            rows = rows.len(),
            key = %key,
            "archived advisory results"
        );

        Ok(CollectOutcome::Collected { rows: rows.len() })
    }
}

/// Project the catalog and summaries into archive rows: exactly one row per
/// catalog check, stamped with the processing date and the account. A check
/// without a summary is recorded as `NotAvailable`, never omitted.
fn normalize(
    date: NaiveDate,
    account: &AccountRef,
    checks: &[CheckDescriptor],
    summaries: &[CheckSummary],
) -> Vec<CheckResult> {
    let by_id: HashMap<&str, &CheckSummary> = summaries
        .iter()
        .map(|summary| (summary.check_id.as_str(), summary))
        .collect();

    checks
        .iter()
        .map(|check| {
            let summary = by_id.get(check.id.as_str());
            CheckResult {
                date,
                account_id: account.account_id.clone(),
                status: summary.map(|s| s.status).unwrap_or(CheckStatus::NotAvailable),
                check_id: check.id.clone(),
                check_name: check.name.clone(),
                estimated_monthly_savings: summary.and_then(|s| s.estimated_monthly_savings),
                account_name: account.account_label.clone(),
                category: check.category.clone(),
            }
        })
        .collect()
}
