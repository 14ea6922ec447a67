//! Run report serialization to JSON and JSON Lines.
//!
//! One record per enumerated file. The textual log is the human surface;
//! this is the machine one.

use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use crate::types::{FileOutcome, RunReport};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// One serializable record per file outcome.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportRecord {
    /// The file was classified and moved
    Sorted {
        file: PathBuf,
        label: String,
        destination: PathBuf,
        probabilities: Vec<f32>,
    },
    /// The file failed at some stage and was left in place
    Failed {
        file: PathBuf,
        stage: String,
        reason: String,
    },
}

impl From<&FileOutcome> for ReportRecord {
    fn from(outcome: &FileOutcome) -> Self {
        match &outcome.result {
            Ok(c) => ReportRecord::Sorted {
                file: outcome.path.clone(),
                label: c.label.clone(),
                destination: c.destination.clone(),
                probabilities: c.probabilities.clone(),
            },
            Err(e) => ReportRecord::Failed {
                file: outcome.path.clone(),
                stage: e.stage().to_string(),
                reason: e.to_string(),
            },
        }
    }
}

/// Write a run report to `writer` in the requested format.
///
/// `pretty` only affects the JSON array format; JSONL is always one compact
/// object per line.
pub fn write_report<W: Write>(
    mut writer: W,
    report: &RunReport,
    format: OutputFormat,
    pretty: bool,
) -> io::Result<()> {
    let records: Vec<ReportRecord> = report.outcomes.iter().map(ReportRecord::from).collect();

    match format {
        OutputFormat::Json => {
            if pretty {
                serde_json::to_writer_pretty(&mut writer, &records).map_err(io::Error::other)?;
            } else {
                serde_json::to_writer(&mut writer, &records).map_err(io::Error::other)?;
            }
            writeln!(writer)?;
        }
        OutputFormat::JsonLines => {
            for record in &records {
                serde_json::to_writer(&mut writer, record).map_err(io::Error::other)?;
                writeln!(writer)?;
            }
        }
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileError;
    use crate::types::Classification;
    use std::time::Duration;

    fn sample_report() -> RunReport {
        RunReport {
            outcomes: vec![
                FileOutcome {
                    path: PathBuf::from("a.jpg"),
                    result: Ok(Classification {
                        label: "cat".to_string(),
                        label_index: 0,
                        probabilities: vec![0.75, 0.25],
                        destination: PathBuf::from("cat/a.jpg"),
                    }),
                },
                FileOutcome {
                    path: PathBuf::from("b.txt"),
                    result: Err(FileError::Decode {
                        path: PathBuf::from("b.txt"),
                        message: "not an image".to_string(),
                    }),
                },
            ],
            elapsed: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("ndjson"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }

    #[test]
    fn test_write_jsonl_one_line_per_file() {
        let mut buf = Vec::new();
        write_report(&mut buf, &sample_report(), OutputFormat::JsonLines, false).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#""status":"sorted""#));
        assert!(lines[0].contains(r#""label":"cat""#));
        assert!(lines[1].contains(r#""status":"failed""#));
        assert!(lines[1].contains(r#""stage":"decode""#));
    }

    #[test]
    fn test_write_json_array() {
        let mut buf = Vec::new();
        write_report(&mut buf, &sample_report(), OutputFormat::Json, false).unwrap();

        let records: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(records.as_array().unwrap().len(), 2);
        assert_eq!(records[0]["status"], "sorted");
        assert_eq!(records[1]["reason"], "Decode error for b.txt: not an image");
    }
}
