use crate::domain::account::{AssetAccount, Balance};
use crate::domain::ports::{AccountStore, Ledger, PoolStore};
use crate::error::{Result, RewardError};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for engine account states.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for ledger balances.
pub const CF_BALANCES: &str = "balances";
/// Column Family for singleton engine state such as the reward pool.
pub const CF_META: &str = "meta";

const POOL_KEY: &[u8] = b"reward_pool";

/// A persistent store implementation using RocksDB.
///
/// One database backs all three ports: `AccountStore`, `Ledger` and
/// `PoolStore`, each in its own Column Family. This struct is thread-safe
/// (`Clone` shares the underlying `Arc<DB>`), which lets a single opened
/// database be boxed once per port.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default()),
            ColumnFamilyDescriptor::new(CF_BALANCES, Options::default()),
            ColumnFamilyDescriptor::new(CF_META, Options::default()),
        ];
        let db = DB::open_cf_descriptors(&opts, path, cfs)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            RewardError::InternalError(Box::new(std::io::Error::other(format!(
                "{} column family not found",
                name
            ))))
        })
    }

    fn read<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.handle(cf_name)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| RewardError::InternalError(Box::new(e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.handle(cf_name)?;
        let bytes =
            serde_json::to_vec(value).map_err(|e| RewardError::InternalError(Box::new(e)))?;
        self.db.put_cf(cf, key, bytes)?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for RocksDBStore {
    async fn store(&self, account: AssetAccount) -> Result<()> {
        self.write(CF_ACCOUNTS, account.address.as_bytes(), &account)
    }

    async fn get(&self, address: &str) -> Result<Option<AssetAccount>> {
        self.read(CF_ACCOUNTS, address.as_bytes())
    }

    async fn all_accounts(&self) -> Result<Vec<AssetAccount>> {
        let cf = self.handle(CF_ACCOUNTS)?;
        let mut accounts = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let account = serde_json::from_slice(&value)
                .map_err(|e| RewardError::InternalError(Box::new(e)))?;
            accounts.push(account);
        }
        Ok(accounts)
    }
}

#[async_trait]
impl Ledger for RocksDBStore {
    async fn credit(&self, account: &str, amount: Balance) -> Result<()> {
        if amount <= Balance::ZERO {
            return Err(RewardError::TransferFailure(
                "Credit amount must be positive".to_string(),
            ));
        }
        let balance: Balance = self
            .read(CF_BALANCES, account.as_bytes())?
            .unwrap_or(Balance::ZERO);
        self.write(CF_BALANCES, account.as_bytes(), &(balance + amount))
    }

    async fn transfer(&self, from: &str, to: &str, amount: Balance) -> Result<()> {
        if amount < Balance::ZERO {
            return Err(RewardError::TransferFailure(
                "Transfer amount must not be negative".to_string(),
            ));
        }
        let from_balance: Balance = self
            .read(CF_BALANCES, from.as_bytes())?
            .unwrap_or(Balance::ZERO);
        if from_balance < amount {
            return Err(RewardError::TransferFailure(format!(
                "Insufficient balance for {}",
                from
            )));
        }
        let to_balance: Balance = self
            .read(CF_BALANCES, to.as_bytes())?
            .unwrap_or(Balance::ZERO);

        // Both sides land in one batch so a crash cannot split the transfer.
        let cf = self.handle(CF_BALANCES)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(
            cf,
            from.as_bytes(),
            serde_json::to_vec(&(from_balance - amount))
                .map_err(|e| RewardError::InternalError(Box::new(e)))?,
        );
        batch.put_cf(
            cf,
            to.as_bytes(),
            serde_json::to_vec(&(to_balance + amount))
                .map_err(|e| RewardError::InternalError(Box::new(e)))?,
        );
        self.db.write(batch)?;
        Ok(())
    }

    async fn balance_of(&self, account: &str) -> Result<Balance> {
        Ok(self
            .read(CF_BALANCES, account.as_bytes())?
            .unwrap_or(Balance::ZERO))
    }
}

#[async_trait]
impl PoolStore for RocksDBStore {
    async fn load(&self) -> Result<Option<Balance>> {
        self.read(CF_META, POOL_KEY)
    }

    async fn save(&self, pool: Balance) -> Result<()> {
        self.write(CF_META, POOL_KEY, &pool)
    }
}
