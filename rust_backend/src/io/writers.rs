use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::domain::CleanRecord;
use crate::io::loaders::RecordFormat;

/// Write cleaned records to any writer
///
/// JSON output is a pretty-printed array; JSON Lines output is one compact
/// object per line.
pub fn write_records_to<W: Write>(
    mut writer: W,
    records: &[CleanRecord],
    format: RecordFormat,
) -> Result<()> {
    match format {
        RecordFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, records)
                .context("Failed to serialize records as JSON")?;
            writeln!(writer)?;
        }
        RecordFormat::JsonLines => {
            for record in records {
                serde_json::to_writer(&mut writer, record)
                    .context("Failed to serialize record as JSON")?;
                writeln!(writer)?;
            }
        }
    }
    writer.flush().context("Failed to flush output")?;
    Ok(())
}

/// Write cleaned records to a file, replacing any existing content
pub fn write_records(path: &Path, records: &[CleanRecord], format: RecordFormat) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_records_to(BufWriter::new(file), records, format)
        .with_context(|| format!("Failed to write records to {}", path.display()))
}

/// Render cleaned records as a string in the given format
pub fn records_to_string(records: &[CleanRecord], format: RecordFormat) -> Result<String> {
    let mut buffer = Vec::new();
    write_records_to(&mut buffer, records, format)?;
    String::from_utf8(buffer).context("Serialized records are not valid UTF-8")
}
