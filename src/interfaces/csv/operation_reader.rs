use crate::domain::operation::Operation;
use crate::error::{Result, RewardError};
use std::io::Read;

/// Reads engine operations from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<Operation>`,
/// trimming whitespace and tolerating flexible record lengths so large
/// scenario files stream without loading into memory.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    /// Creates a new `OperationReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn operations(self) -> impl Iterator<Item = Result<Operation>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(RewardError::from))
    }
}
