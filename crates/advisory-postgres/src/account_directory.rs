use crate::client::PostgresClient;
use advisory_domain::{AccountDirectory, AccountRef, DirectoryError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Account directory backed by a read-only scan of an inventory table.
///
/// The table is owned by the account onboarding process; this side only
/// requires the two projected columns `account_id` and `account_name`.
pub struct PostgresAccountDirectory {
    client: PostgresClient,
    table: String,
}

impl PostgresAccountDirectory {
    pub fn new(client: PostgresClient, table: String) -> Self {
        Self { client, table }
    }
}

#[async_trait]
impl AccountDirectory for PostgresAccountDirectory {
    #[instrument(skip(self), fields(table = %self.table))]
    async fn list_accounts(&self) -> Result<Vec<AccountRef>, DirectoryError> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DirectoryError::Unreachable)?;

        let query = format!("SELECT account_id, account_name FROM {}", self.table);
        let rows = conn
            .query(&query, &[])
            .await
            .map_err(|e| DirectoryError::Unreachable(e.into()))?;

        let accounts: Vec<AccountRef> = rows
            .iter()
            .map(|row| AccountRef {
                account_id: row.get("account_id"),
                account_label: row.get("account_name"),
            })
            .collect();

        debug!(account_count = accounts.len(), "scanned account inventory");
        Ok(accounts)
    }
}
