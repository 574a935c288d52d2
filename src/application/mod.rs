//! Application layer containing the core accounting logic.
//!
//! This module defines the `RewardEngine` which enforces deposit validity,
//! accrues time-based rewards and settles claims against the shared reward
//! pool. Operations run strictly sequentially: every ledger and storage
//! call is awaited before the next operation starts.

pub mod engine;
