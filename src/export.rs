use std::path::Path;

use tokio::{fs::File, io::AsyncWriteExt};

use crate::parse::Record;
use crate::Result;

/// Writes the records as UTF-8 CSV (`Act Title`, `PDF URL`), absent fields as empty cells.
/// Nothing is written for an empty slice. Returns whether a file was produced.
pub async fn write_csv(path: impl AsRef<Path>, records: &[Record]) -> Result<bool> {
    if records.is_empty() {
        return Ok(false);
    }

    let bytes = to_csv_bytes(records)?;
    let mut file = File::create(path).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    Ok(true)
}

fn to_csv_bytes(records: &[Record]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for record in records {
        wtr.serialize(record)?;
    }
    Ok(wtr.into_inner()?)
}
