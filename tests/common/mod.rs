use std::io::Error;
use std::path::Path;

pub fn write_operations(path: &Path, rows: &[[&str; 4]]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["op", "account", "amount", "at"])?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
