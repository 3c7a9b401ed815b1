use crate::error::DirectoryError;
use crate::types::AccountRef;
use async_trait::async_trait;

/// Capability: produce the full set of accounts to process.
///
/// Implementations must be total: if the backing inventory cannot be read,
/// fail with `DirectoryError::Unreachable` instead of returning whatever
/// subset happened to load. No ordering guarantee is made.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<AccountRef>, DirectoryError>;
}

/// Directory backed by a fixed, configured account list. Useful for small
/// organizations and for environments without an inventory table.
pub struct StaticAccountDirectory {
    accounts: Vec<AccountRef>,
}

impl StaticAccountDirectory {
    pub fn new(accounts: Vec<AccountRef>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl AccountDirectory for StaticAccountDirectory {
    async fn list_accounts(&self) -> Result<Vec<AccountRef>, DirectoryError> {
        Ok(self.accounts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_directory_returns_configured_accounts() {
        let accounts = vec![
            AccountRef {
                account_id: "111111111111".to_string(),
                account_label: "acme-prod".to_string(),
            },
            AccountRef {
                account_id: "222222222222".to_string(),
                account_label: "acme-dev".to_string(),
            },
        ];

        let directory = StaticAccountDirectory::new(accounts.clone());

        let listed = directory.list_accounts().await.unwrap();
        assert_eq!(listed, accounts);
    }

    #[tokio::test]
    async fn test_static_directory_empty() {
        let directory = StaticAccountDirectory::new(Vec::new());

        let listed = directory.list_accounts().await.unwrap();
        assert!(listed.is_empty());
    }
}
