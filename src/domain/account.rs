use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A monetary value in the ledger's base unit.
///
/// This is a wrapper around `rust_decimal::Decimal` to keep financial
/// arithmetic exact and type-checked across the ledger, the reward pool and
/// reward payouts.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == Decimal::ZERO
    }

    /// Strips trailing fractional zeros so reports print canonically
    /// (`0.40` becomes `0.4`).
    pub fn normalize(&self) -> Self {
        Self(self.0.normalize())
    }
}

impl From<Decimal> for Balance {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// Per-account deposit state tracked by the engine.
///
/// `deposited` counts deposit units (principal divided by the deposit unit),
/// `last_deposit_at` anchors reward accrual and is reset by every deposit
/// and every successful claim.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AssetAccount {
    /// Address-like unique key on the ledger.
    pub address: String,
    /// Deposit units held (always a whole number).
    pub deposited: u64,
    /// Unix seconds of the most recent deposit or claim.
    pub last_deposit_at: u64,
}

impl AssetAccount {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            deposited: 0,
            last_deposit_at: 0,
        }
    }

    /// Adds deposit units and moves the accrual anchor to `now`.
    pub fn record_deposit(&mut self, units: u64, now: u64) {
        self.deposited += units;
        self.last_deposit_at = now;
    }

    /// Restarts accrual from `now` after a claim.
    pub fn reset_accrual(&mut self, now: u64) {
        self.last_deposit_at = now;
    }
}

/// Final per-account view written by the CSV interface: engine state plus
/// the ledger balance and the reward accrued up to now.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct AccountReport {
    pub account: String,
    pub deposited: u64,
    pub balance: Balance,
    pub reward: Balance,
}
