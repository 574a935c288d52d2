use thiserror::Error;

pub type Result<T> = std::result::Result<T, RewardError>;

#[derive(Error, Debug)]
pub enum RewardError {
    #[error("{0}")]
    InvalidDepositAmount(String),
    #[error("Not enough rewards in pool")]
    InsufficientPoolBalance,
    #[error("Transfer failed: {0}")]
    TransferFailure(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}
