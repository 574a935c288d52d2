use assetvault::application::engine::{RewardConfig, RewardEngine};
use assetvault::domain::account::Balance;
use assetvault::domain::ports::{AccountStoreBox, ClockRef, LedgerBox, PoolStoreBox};
use assetvault::infrastructure::clock::ManualClock;
use assetvault::infrastructure::in_memory::{
    InMemoryAccountStore, InMemoryLedger, InMemoryPoolStore,
};
#[cfg(feature = "storage-rocksdb")]
use assetvault::infrastructure::rocksdb::RocksDBStore;
use assetvault::interfaces::csv::account_writer::AccountWriter;
use assetvault::interfaces::csv::operation_reader::OperationReader;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Initial reward pool balance
    #[arg(long)]
    pool: Option<Decimal>,

    /// Reward rate as a fraction of deposited principal per elapsed day
    #[arg(long)]
    rate: Option<Decimal>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = RewardConfig::default();
    if let Some(pool) = cli.pool {
        config.initial_pool = Balance::new(pool);
    }
    if let Some(rate) = cli.rate {
        config.daily_rate = rate;
    }

    // Scenario time is scripted by the `at` column of the input.
    let clock = Arc::new(ManualClock::default());
    let clock_ref: ClockRef = clock.clone();

    let engine = match cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => {
            // Use persistent storage (RocksDB); one database serves all ports.
            let store = RocksDBStore::open(db_path).into_diagnostic()?;

            let accounts: AccountStoreBox = Box::new(store.clone());
            let pool: PoolStoreBox = Box::new(store.clone());
            let ledger: LedgerBox = Box::new(store);

            RewardEngine::new(accounts, pool, ledger, clock_ref, config)
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            miette::bail!("persistent storage requires building with the storage-rocksdb feature")
        }
        None => {
            // Use in-memory storage
            let accounts: AccountStoreBox = Box::new(InMemoryAccountStore::new());
            let pool: PoolStoreBox = Box::new(InMemoryPoolStore::new());
            let ledger: LedgerBox = Box::new(InMemoryLedger::new());

            RewardEngine::new(accounts, pool, ledger, clock_ref, config)
        }
    };

    // Process operations
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    for op_result in reader.operations() {
        match op_result {
            Ok(op) => {
                if let Some(at) = op.at {
                    clock.set(at);
                }
                if let Err(e) = engine.apply(op).await {
                    eprintln!("Error processing operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Output final state
    let accounts = engine.into_results().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = AccountWriter::new(stdout.lock());
    writer.write_accounts(accounts).into_diagnostic()?;

    Ok(())
}
