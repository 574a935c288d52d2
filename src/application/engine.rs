use crate::domain::account::{AccountReport, AssetAccount, Balance};
use crate::domain::operation::{Operation, OperationType};
use crate::domain::ports::{AccountStoreBox, ClockRef, LedgerBox, PoolStoreBox};
use crate::error::{Result, RewardError};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Ledger address of the engine's own holding account. Deposited principal
/// sits here and reward payouts are drawn from here.
pub const VAULT_ADDRESS: &str = "vault";

/// Constants fixed at engine initialization.
#[derive(Debug, Clone)]
pub struct RewardConfig {
    /// Shared reward pool balance at system creation.
    pub initial_pool: Balance,
    /// Fraction of deposited principal accrued per elapsed day.
    pub daily_rate: Decimal,
    /// Deposits must be exact multiples of this base-unit amount; one
    /// deposit unit equals this much principal.
    pub deposit_unit: Decimal,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            initial_pool: Balance::new(dec!(10000)),
            daily_rate: dec!(0.01),
            deposit_unit: dec!(10),
        }
    }
}

/// The deposit/reward accounting engine.
///
/// Tracks each account's deposited principal, computes time-accrued rewards
/// against the shared reward pool, and settles deposits and claims through
/// the ledger collaborator. State only changes after the ledger accepts the
/// corresponding transfer, so a refused transfer leaves no partial
/// bookkeeping behind.
pub struct RewardEngine {
    account_store: AccountStoreBox,
    pool_store: PoolStoreBox,
    ledger: LedgerBox,
    clock: ClockRef,
    config: RewardConfig,
}

impl RewardEngine {
    pub fn new(
        account_store: AccountStoreBox,
        pool_store: PoolStoreBox,
        ledger: LedgerBox,
        clock: ClockRef,
        config: RewardConfig,
    ) -> Self {
        Self {
            account_store,
            pool_store,
            ledger,
            clock,
            config,
        }
    }

    /// Dispatches one operation from the client adapter.
    pub async fn apply(&self, op: Operation) -> Result<()> {
        match op.op {
            OperationType::Fund => {
                let amount = op.amount.ok_or_else(|| {
                    RewardError::TransferFailure("Fund missing amount".to_string())
                })?;
                self.fund(&op.account, Balance::new(amount)).await
            }
            OperationType::Deposit => {
                let amount = op.amount.ok_or_else(|| {
                    RewardError::InvalidDepositAmount("Deposit missing amount".to_string())
                })?;
                self.deposit(&op.account, Balance::new(amount)).await
            }
            OperationType::Claim => self.claim_reward(&op.account).await.map(|_| ()),
        }
    }

    /// Credits the account on the ledger so it has something to deposit.
    pub async fn fund(&self, address: &str, amount: Balance) -> Result<()> {
        self.ledger.credit(address, amount).await
    }

    /// Moves `amount` from the account into the vault and credits the
    /// matching deposit units.
    ///
    /// The raw base-unit amount is validated before any unit conversion:
    /// it must be positive and an exact multiple of the deposit unit.
    pub async fn deposit(&self, address: &str, amount: Balance) -> Result<()> {
        if amount <= Balance::ZERO {
            return Err(RewardError::InvalidDepositAmount(
                "Deposit must be positive".to_string(),
            ));
        }
        if amount.0 % self.config.deposit_unit != Decimal::ZERO {
            return Err(RewardError::InvalidDepositAmount(format!(
                "Deposit must be a multiple of {}",
                self.config.deposit_unit
            )));
        }
        let units = (amount.0 / self.config.deposit_unit).to_u64().ok_or_else(|| {
            RewardError::InvalidDepositAmount("Deposit exceeds the supported range".to_string())
        })?;

        self.ledger.transfer(address, VAULT_ADDRESS, amount).await?;

        let mut account = self.assets(address).await?;
        account.record_deposit(units, self.clock.now());
        self.account_store.store(account).await
    }

    /// Reward accrued by the account up to now. Pure read.
    pub async fn calculate_reward(&self, address: &str) -> Result<Balance> {
        let account = self.assets(address).await?;
        Ok(self.accrued(&account))
    }

    /// Pays out the accrued reward from the vault and restarts accrual.
    ///
    /// Fails with `InsufficientPoolBalance` before any state change when the
    /// reward would overdraw the pool. Returns the amount paid.
    pub async fn claim_reward(&self, address: &str) -> Result<Balance> {
        let mut account = self.assets(address).await?;
        if account.deposited == 0 {
            return Ok(Balance::ZERO);
        }

        let reward = self.accrued(&account);
        let pool = self.pool_balance().await?;
        if pool < reward {
            return Err(RewardError::InsufficientPoolBalance);
        }

        // Pay out first; pool and accrual anchor only move after the ledger
        // accepts the transfer.
        self.ledger.transfer(VAULT_ADDRESS, address, reward).await?;
        self.pool_store.save(pool - reward).await?;
        account.reset_accrual(self.clock.now());
        self.account_store.store(account).await?;

        Ok(reward)
    }

    /// The account record, zeroed for addresses never seen.
    pub async fn assets(&self, address: &str) -> Result<AssetAccount> {
        Ok(self
            .account_store
            .get(address)
            .await?
            .unwrap_or_else(|| AssetAccount::new(address)))
    }

    /// Remaining reward pool balance.
    pub async fn pool_balance(&self) -> Result<Balance> {
        Ok(self
            .pool_store
            .load()
            .await?
            .unwrap_or(self.config.initial_pool))
    }

    /// Ledger balance of the account.
    pub async fn balance_of(&self, address: &str) -> Result<Balance> {
        self.ledger.balance_of(address).await
    }

    /// Consumes the engine and returns the final view of all accounts,
    /// sorted by address.
    pub async fn into_results(self) -> Result<Vec<AccountReport>> {
        let mut accounts = self.account_store.all_accounts().await?;
        accounts.sort_by(|a, b| a.address.cmp(&b.address));

        let mut reports = Vec::with_capacity(accounts.len());
        for account in accounts {
            let balance = self.ledger.balance_of(&account.address).await?;
            let reward = self.accrued(&account);
            reports.push(AccountReport {
                account: account.address,
                deposited: account.deposited,
                balance: balance.normalize(),
                reward: reward.normalize(),
            });
        }
        Ok(reports)
    }

    fn accrued(&self, account: &AssetAccount) -> Balance {
        if account.deposited == 0 {
            return Balance::ZERO;
        }
        let elapsed = self.clock.now().saturating_sub(account.last_deposit_at);
        let days = elapsed / SECONDS_PER_DAY;
        let principal = Decimal::from(account.deposited) * self.config.deposit_unit;
        Balance::new(principal * self.config.daily_rate * Decimal::from(days))
    }
}
