//! Bulk import of password entries from CSV files.
//!
//! The first row names the columns. Besides `key,value,login_uri,notes` the
//! column names used by common browser and password-manager exports are
//! accepted (`name`, `password`, `url`, `note`, ...), matched without regard
//! to case. Other columns are ignored. Rows without a name or a password are
//! skipped and counted.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::NewPasswordEntry;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("No passwords found in file")]
    Empty,

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    #[serde(alias = "name", alias = "title")]
    key: Option<String>,
    #[serde(alias = "password")]
    value: Option<String>,
    #[serde(alias = "url", alias = "loginuri", alias = "login_url")]
    login_uri: Option<String>,
    #[serde(alias = "note")]
    notes: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.is_empty())
}

impl CsvRow {
    fn into_entry(self) -> Option<NewPasswordEntry> {
        Some(NewPasswordEntry {
            key: non_empty(self.key)?,
            value: non_empty(self.value)?,
            notes: non_empty(self.notes),
            login_uri: non_empty(self.login_uri),
        })
    }
}

/// Rows read from a CSV file, ready to upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCsv {
    pub entries: Vec<NewPasswordEntry>,
    pub skipped: usize,
}

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        let noun = if self.imported == 1 { "password" } else { "passwords" };
        let mut message = format!("Imported {} {}.", self.imported, noun);
        if self.skipped > 0 {
            message.push_str(&format!(" {} incomplete rows skipped.", self.skipped));
        }
        if self.failed > 0 {
            message.push_str(&format!(" {} could not be saved.", self.failed));
        }
        message
    }
}

pub fn parse_csv<R: Read>(input: R) -> Result<ParsedCsv, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers: csv::StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();
    reader.set_headers(headers);

    let mut parsed = ParsedCsv::default();
    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        match row {
            Ok(row) => match row.into_entry() {
                Some(entry) => parsed.entries.push(entry),
                None => parsed.skipped += 1,
            },
            Err(e) => {
                // Row numbers are 1-based and the header is row 1
                warn!(row = index + 2, error = %e, "Skipping unreadable CSV row");
                parsed.skipped += 1;
            }
        }
    }

    if parsed.entries.is_empty() {
        return Err(ImportError::Empty);
    }
    debug!(
        rows = parsed.entries.len(),
        skipped = parsed.skipped,
        "CSV parsed"
    );
    Ok(parsed)
}

pub fn read_csv_file(path: &Path) -> Result<ParsedCsv, ImportError> {
    let file = std::fs::File::open(path).map_err(|source| ImportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(file)
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(input: &str) -> PathBuf {
    let input = input.trim();
    let rest = match input.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(input),
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(input),
    }
}

/// Upload parsed rows one by one. A rejected token aborts the run; other
/// per-row failures are counted.
pub async fn import_entries(
    api: &ApiClient,
    parsed: ParsedCsv,
) -> Result<ImportSummary, ImportError> {
    let mut summary = ImportSummary {
        skipped: parsed.skipped,
        ..Default::default()
    };

    for entry in &parsed.entries {
        match api.create_password(entry).await {
            Ok(_) => summary.imported += 1,
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => {
                warn!(key = %entry.key, error = %e, "Failed to import entry");
                summary.failed += 1;
            }
        }
    }

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        failed = summary.failed,
        "CSV import finished"
    );
    Ok(summary)
}

/// Read `path` and upload its rows.
pub async fn import_file(api: &ApiClient, path: &Path) -> Result<ImportSummary, ImportError> {
    let parsed = read_csv_file(path)?;
    import_entries(api, parsed).await
}
