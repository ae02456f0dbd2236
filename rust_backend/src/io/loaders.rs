use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::domain::RawRecord;

/// Serialization format of a record file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// A JSON array of row objects
    Json,
    /// One JSON row object per line
    JsonLines,
}

impl RecordFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFormat::Json => "json",
            RecordFormat::JsonLines => "jsonl",
        }
    }

    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .context("File has no extension")?;

        extension
            .parse::<RecordFormat>()
            .map_err(|e: String| anyhow::anyhow!(e))
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(RecordFormat::Json),
            "jsonl" | "ndjson" => Ok(RecordFormat::JsonLines),
            other => Err(format!("Unsupported file format: {}", other)),
        }
    }
}

/// Object form of a records document: `{"records": [...]}`
#[derive(Debug, Deserialize)]
struct WrappedRecords {
    records: Vec<RawRecord>,
}

/// Result of loading raw records
#[derive(Debug)]
pub struct RecordLoadResult {
    pub records: Vec<RawRecord>,
    pub format: RecordFormat,
    pub num_records: usize,
}

impl RecordLoadResult {
    pub fn new(records: Vec<RawRecord>, format: RecordFormat) -> Self {
        let num_records = records.len();
        Self {
            records,
            format,
            num_records,
        }
    }
}

/// Unified interface for loading raw records from JSON or JSON Lines
pub struct RecordLoader;

impl RecordLoader {
    /// Load raw records from a file (auto-detects JSON or JSON Lines)
    pub fn load_from_file(path: &Path) -> Result<RecordLoadResult> {
        match RecordFormat::from_path(path)? {
            RecordFormat::Json => Self::load_from_json(path),
            RecordFormat::JsonLines => Self::load_from_jsonl(path),
        }
    }

    /// Load raw records from a JSON file
    pub fn load_from_json(path: &Path) -> Result<RecordLoadResult> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read records file: {}", path.display()))?;
        Self::load_from_json_str(&content)
            .with_context(|| format!("Failed to parse JSON file: {}", path.display()))
    }

    /// Load raw records from a JSON string
    ///
    /// Accepts either an array of rows or an object with a `records` array.
    pub fn load_from_json_str(json_str: &str) -> Result<RecordLoadResult> {
        let mut deserializer = serde_json::Deserializer::from_str(json_str);
        let records = if json_str.trim_start().starts_with('{') {
            let wrapped: WrappedRecords = serde_path_to_error::deserialize(&mut deserializer)
                .context("Failed to parse records JSON")?;
            wrapped.records
        } else {
            let rows: Vec<RawRecord> = serde_path_to_error::deserialize(&mut deserializer)
                .context("Failed to parse records JSON")?;
            rows
        };
        deserializer
            .end()
            .context("Unexpected trailing content after records JSON")?;
        log::debug!("Loaded {} raw records from JSON", records.len());

        Ok(RecordLoadResult::new(records, RecordFormat::Json))
    }

    /// Load raw records from a JSON Lines file
    pub fn load_from_jsonl(path: &Path) -> Result<RecordLoadResult> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read records file: {}", path.display()))?;
        Self::load_from_jsonl_str(&content)
            .with_context(|| format!("Failed to parse JSON Lines file: {}", path.display()))
    }

    /// Load raw records from a JSON Lines string
    ///
    /// Blank lines are skipped.
    pub fn load_from_jsonl_str(jsonl_str: &str) -> Result<RecordLoadResult> {
        let mut records = Vec::new();

        for (index, line) in jsonl_str.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut deserializer = serde_json::Deserializer::from_str(line);
            let record: RawRecord = serde_path_to_error::deserialize(&mut deserializer)
                .with_context(|| format!("Failed to parse record on line {}", index + 1))?;
            deserializer
                .end()
                .with_context(|| format!("Unexpected trailing content on line {}", index + 1))?;
            records.push(record);
        }
        log::debug!("Loaded {} raw records from JSON Lines", records.len());

        Ok(RecordLoadResult::new(records, RecordFormat::JsonLines))
    }
}
