use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Fund,
    Deposit,
    Claim,
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Operation {
    pub op: OperationType,
    pub account: String,
    pub amount: Option<Decimal>,
    /// Scenario time in unix seconds; moves the scripted clock forward
    /// before the operation runs.
    pub at: Option<u64>,
}
