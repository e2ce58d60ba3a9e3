//! Batch input and output: one reference per input line, one JSON object
//! per output line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

use crate::models::ExtractedRecord;
use crate::sources::SourceError;

/// Outcome of one batch entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Ok,
    Error,
}

/// Result of extracting one batch entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub input: String,
    pub status: BatchStatus,
    pub processed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<ExtractedRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItem {
    pub fn from_result(
        input: impl Into<String>,
        result: Result<ExtractedRecord, SourceError>,
    ) -> Self {
        let (status, record, error) = match result {
            Ok(record) => (BatchStatus::Ok, Some(record), None),
            Err(e) => (BatchStatus::Error, None, Some(e.to_string())),
        };

        Self {
            input: input.into(),
            status,
            processed_at: Utc::now(),
            record,
            error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == BatchStatus::Ok
    }
}

/// Counts over a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_items(items: &[BatchItem]) -> Self {
        let succeeded = items.iter().filter(|i| i.is_ok()).count();
        Self {
            total: items.len(),
            succeeded,
            failed: items.len() - succeeded,
        }
    }
}

/// Read batch inputs, skipping blank lines and `#` comments
pub fn read_inputs<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut inputs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        inputs.push(trimmed.to_string());
    }
    Ok(inputs)
}

/// Write items as JSON Lines
pub fn write_jsonl<W: Write>(mut writer: W, items: &[BatchItem]) -> io::Result<()> {
    for item in items {
        serde_json::to_writer(&mut writer, item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
