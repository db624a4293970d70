//! Import / export formats and the import summary.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Import accepts the same formats as export.
pub type ImportFormat = ExportFormat;

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Default download name, `trades.csv` / `trades.json`.
    pub fn file_name(self) -> String {
        format!("trades.{}", self.as_str())
    }

    /// Guess from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ParseError::Format(s.to_string())),
        }
    }
}

/// Summary returned by `POST /import`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(default)]
    pub imported: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ImportResult {
    /// The canned result used when uploads are disabled.
    pub fn disabled(reason: &str) -> Self {
        Self {
            message: Some(reason.to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a/b.CSV")), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_path(Path::new("trades.json")), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_path(Path::new("trades.xlsx")), None);
        assert_eq!(ExportFormat::from_path(Path::new("trades")), None);
    }

    #[test]
    fn import_result_tolerates_minimal_body() {
        let res: ImportResult = serde_json::from_str(r#"{"format": "json", "imported": 3}"#).unwrap();
        assert_eq!(res.imported, 3);
        assert_eq!(res.failed, 0);
        assert_eq!(res.format, Some(ExportFormat::Json));
    }

    #[test]
    fn disabled_result_is_empty() {
        let res = ImportResult::disabled("uploads disabled");
        assert_eq!((res.imported, res.failed), (0, 0));
        assert!(res.errors.is_empty());
        assert_eq!(res.message.as_deref(), Some("uploads disabled"));
    }
}
