use crate::domain::account::{AssetAccount, Balance};
use crate::domain::ports::{AccountStore, Ledger, PoolStore};
use crate::error::{Result, RewardError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory ledger of per-account balances.
///
/// `Clone` shares the underlying map, so tests can hold a handle for
/// assertions while the engine owns a boxed copy.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    balances: Arc<RwLock<HashMap<String, Balance>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn credit(&self, account: &str, amount: Balance) -> Result<()> {
        if amount <= Balance::ZERO {
            return Err(RewardError::TransferFailure(
                "Credit amount must be positive".to_string(),
            ));
        }
        let mut balances = self.balances.write().await;
        *balances.entry(account.to_string()).or_default() += amount;
        Ok(())
    }

    async fn transfer(&self, from: &str, to: &str, amount: Balance) -> Result<()> {
        if amount < Balance::ZERO {
            return Err(RewardError::TransferFailure(
                "Transfer amount must not be negative".to_string(),
            ));
        }
        let mut balances = self.balances.write().await;
        let from_balance = balances.get(from).copied().unwrap_or(Balance::ZERO);
        if from_balance < amount {
            return Err(RewardError::TransferFailure(format!(
                "Insufficient balance for {}",
                from
            )));
        }
        balances.insert(from.to_string(), from_balance - amount);
        *balances.entry(to.to_string()).or_default() += amount;
        Ok(())
    }

    async fn balance_of(&self, account: &str) -> Result<Balance> {
        let balances = self.balances.read().await;
        Ok(balances.get(account).copied().unwrap_or(Balance::ZERO))
    }
}

/// A thread-safe in-memory store for asset accounts.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, AssetAccount>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn store(&self, account: AssetAccount) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.address.clone(), account);
        Ok(())
    }

    async fn get(&self, address: &str) -> Result<Option<AssetAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(address).cloned())
    }

    async fn all_accounts(&self) -> Result<Vec<AssetAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().cloned().collect())
    }
}

/// In-memory reward pool; `None` until the first claim settles.
#[derive(Default, Clone)]
pub struct InMemoryPoolStore {
    pool: Arc<RwLock<Option<Balance>>>,
}

impl InMemoryPoolStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PoolStore for InMemoryPoolStore {
    async fn load(&self) -> Result<Option<Balance>> {
        Ok(*self.pool.read().await)
    }

    async fn save(&self, pool: Balance) -> Result<()> {
        *self.pool.write().await = Some(pool);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_ledger_credit_and_balance() {
        let ledger = InMemoryLedger::new();
        ledger.credit("alice", Balance::new(dec!(100))).await.unwrap();
        ledger.credit("alice", Balance::new(dec!(50))).await.unwrap();

        assert_eq!(
            ledger.balance_of("alice").await.unwrap(),
            Balance::new(dec!(150))
        );
        assert_eq!(ledger.balance_of("bob").await.unwrap(), Balance::ZERO);
    }

    #[tokio::test]
    async fn test_ledger_rejects_non_positive_credit() {
        let ledger = InMemoryLedger::new();
        let result = ledger.credit("alice", Balance::new(dec!(-1))).await;
        assert!(matches!(result, Err(RewardError::TransferFailure(_))));
    }

    #[tokio::test]
    async fn test_ledger_transfer_moves_funds() {
        let ledger = InMemoryLedger::new();
        ledger.credit("alice", Balance::new(dec!(100))).await.unwrap();

        ledger
            .transfer("alice", "vault", Balance::new(dec!(40)))
            .await
            .unwrap();

        assert_eq!(
            ledger.balance_of("alice").await.unwrap(),
            Balance::new(dec!(60))
        );
        assert_eq!(
            ledger.balance_of("vault").await.unwrap(),
            Balance::new(dec!(40))
        );
    }

    #[tokio::test]
    async fn test_ledger_transfer_insufficient_balance() {
        let ledger = InMemoryLedger::new();
        ledger.credit("alice", Balance::new(dec!(10))).await.unwrap();

        let result = ledger
            .transfer("alice", "vault", Balance::new(dec!(11)))
            .await;
        assert!(matches!(result, Err(RewardError::TransferFailure(_))));

        // Atomic failure: nothing moved.
        assert_eq!(
            ledger.balance_of("alice").await.unwrap(),
            Balance::new(dec!(10))
        );
        assert_eq!(ledger.balance_of("vault").await.unwrap(), Balance::ZERO);
    }

    #[tokio::test]
    async fn test_ledger_zero_transfer_is_allowed() {
        let ledger = InMemoryLedger::new();
        ledger.transfer("vault", "alice", Balance::ZERO).await.unwrap();
        assert_eq!(ledger.balance_of("alice").await.unwrap(), Balance::ZERO);
    }

    #[tokio::test]
    async fn test_account_store_roundtrip() {
        let store = InMemoryAccountStore::new();
        let mut account = AssetAccount::new("alice");
        account.record_deposit(4, 100);

        store.store(account.clone()).await.unwrap();
        let retrieved = store.get("alice").await.unwrap().unwrap();
        assert_eq!(retrieved, account);

        assert!(store.get("bob").await.unwrap().is_none());
        assert_eq!(store.all_accounts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_pool_store_defaults_to_unset() {
        let store = InMemoryPoolStore::new();
        assert!(store.load().await.unwrap().is_none());

        store.save(Balance::new(dec!(9999.6))).await.unwrap();
        assert_eq!(
            store.load().await.unwrap(),
            Some(Balance::new(dec!(9999.6)))
        );
    }
}
