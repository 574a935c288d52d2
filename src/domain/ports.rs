use super::account::{AssetAccount, Balance};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Mints `amount` onto the account, funding it for deposits.
    async fn credit(&self, account: &str, amount: Balance) -> Result<()>;
    /// Moves `amount` between accounts; fails atomically if `from` cannot
    /// cover it.
    async fn transfer(&self, from: &str, to: &str, amount: Balance) -> Result<()>;
    async fn balance_of(&self, account: &str) -> Result<Balance>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn store(&self, account: AssetAccount) -> Result<()>;
    async fn get(&self, address: &str) -> Result<Option<AssetAccount>>;
    async fn all_accounts(&self) -> Result<Vec<AssetAccount>>;
}

#[async_trait]
pub trait PoolStore: Send + Sync {
    async fn load(&self) -> Result<Option<Balance>>;
    async fn save(&self, pool: Balance) -> Result<()>;
}

pub trait Clock: Send + Sync {
    /// Current time in unix seconds.
    fn now(&self) -> u64;
}

pub type LedgerBox = Box<dyn Ledger>;
pub type AccountStoreBox = Box<dyn AccountStore>;
pub type PoolStoreBox = Box<dyn PoolStore>;
pub type ClockRef = Arc<dyn Clock>;
