//! Drive normalization, brand resolution, and upserts over a whole batch.
//!
//! A batch runs inside one transaction. Under [`FailurePolicy::FailFast`] the
//! first failing record rolls everything back; under
//! [`FailurePolicy::SkipAndContinue`] each record gets its own savepoint, a
//! failing record is rolled back to it and logged, and the batch commits at
//! the end.

use std::path::Path;

use hotel_deposit_catalog::types::ImportLog;
use hotel_deposit_db::operations::{self, ConflictFields};
use hotel_deposit_db::open_database;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;

use crate::error::ImportError;
use crate::normalize::{RawRecord, parse_tabular};
use crate::progress::ImportProgress;
use crate::resolve::resolve_brand;
use crate::upsert::{Coercion, UpsertOutcome, now_rfc3339, upsert_record};

/// What happens to the batch when one record fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Roll back the whole batch and return the error.
    FailFast,
    /// Roll back only the failing record, log it, and keep going.
    SkipAndContinue,
}

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `{"brands": [...], "hotels": [...]}`
    Json,
    /// Comma-separated rows under a header line.
    Tabular,
}

impl SourceFormat {
    /// Infer the format from a file extension (`.json` or `.csv`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Tabular),
            _ => None,
        }
    }

    /// Label recorded in the import log.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Tabular => "csv",
        }
    }
}

/// Knobs for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub failure_policy: FailurePolicy,
    pub on_conflict: ConflictFields,
    pub coercion: Coercion,
    /// Source type recorded in the import log.
    pub source_type: String,
}

impl BatchOptions {
    /// Defaults for a file format: JSON fails fast with strict values,
    /// tabular skips bad rows and coerces leniently.
    pub fn for_format(format: SourceFormat) -> Self {
        let (failure_policy, coercion) = match format {
            SourceFormat::Json => (FailurePolicy::FailFast, Coercion::Strict),
            SourceFormat::Tabular => (FailurePolicy::SkipAndContinue, Coercion::Lenient),
        };
        Self {
            failure_policy,
            on_conflict: ConflictFields::file_import(),
            coercion,
            source_type: format.as_str().to_string(),
        }
    }

    /// Options for administrative payloads.
    pub fn admin() -> Self {
        Self {
            failure_policy: FailurePolicy::FailFast,
            on_conflict: ConflictFields::admin(),
            coercion: Coercion::Strict,
            source_type: "admin".to_string(),
        }
    }
}

/// A parsed batch, ready to run.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Name recorded in the import log (usually the file name).
    pub source_name: String,
    pub format: SourceFormat,
    /// Brand names upserted before any record.
    pub brands: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl Batch {
    /// Parse a JSON document of the form `{"brands": [..], "hotels": [..]}`.
    /// Both keys are optional.
    pub fn from_json_str(source_name: &str, content: &str) -> Result<Self, ImportError> {
        let doc: Value = serde_json::from_str(content)
            .map_err(|e| ImportError::format(format!("invalid JSON: {e}")))?;
        let Value::Object(mut doc) = doc else {
            return Err(ImportError::format("top-level JSON value must be an object"));
        };

        let brands = match doc.remove("brands") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(ImportError::format(format!(
                        "`brands` entries must be strings, got {other}"
                    ))),
                })
                .collect::<Result<_, _>>()?,
            Some(_) => return Err(ImportError::format("`brands` must be an array")),
        };

        let records = match doc.remove("hotels") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(obj) => Ok(RawRecord::Json(obj)),
                    other => Err(ImportError::format(format!(
                        "`hotels` entries must be objects, got {other}"
                    ))),
                })
                .collect::<Result<_, _>>()?,
            Some(_) => return Err(ImportError::format("`hotels` must be an array")),
        };

        Ok(Self {
            source_name: source_name.to_string(),
            format: SourceFormat::Json,
            brands,
            records,
        })
    }

    /// Parse comma-separated text with a header line.
    pub fn from_tabular_str(source_name: &str, content: &str) -> Result<Self, ImportError> {
        Ok(Self {
            source_name: source_name.to_string(),
            format: SourceFormat::Tabular,
            brands: Vec::new(),
            records: parse_tabular(content)?,
        })
    }

    /// Read and parse a file. The format is inferred from the extension
    /// unless given.
    pub fn read(path: &Path, format: Option<SourceFormat>) -> Result<Self, ImportError> {
        let format = match format.or_else(|| SourceFormat::from_path(path)) {
            Some(f) => f,
            None => {
                return Err(ImportError::format(format!(
                    "unsupported file type: {} (use .json or .csv)",
                    path.display()
                )));
            }
        };
        let content = std::fs::read_to_string(path)?;
        let source_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        match format {
            SourceFormat::Json => Self::from_json_str(&source_name, &content),
            SourceFormat::Tabular => Self::from_tabular_str(&source_name, &content),
        }
    }
}

/// Statistics from a single batch.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Brand names upserted by the pre-pass.
    pub brands: u64,
    pub hotels_created: u64,
    pub hotels_updated: u64,
    pub policies_written: u64,
    /// Records whose hotel upsert produced a row.
    pub imported: u64,
    pub skipped: u64,
    pub total_records: u64,
}

impl ImportStats {
    fn record(&mut self, outcome: &UpsertOutcome, label: &str) {
        if outcome.hotel_id.is_none() {
            log::warn!("Skipped {label}: upsert matched no hotel row");
            self.skipped += 1;
            return;
        }
        self.imported += 1;
        if outcome.created {
            self.hotels_created += 1;
        } else {
            self.hotels_updated += 1;
        }
        if outcome.policy_written {
            self.policies_written += 1;
        }
    }
}

/// Run a batch inside one transaction.
///
/// The transaction is committed once at the end. Any error that escapes
/// (every record error under `FailFast`, storage errors outside a record
/// under either policy) drops it, which rolls back every write of the batch.
/// An import log entry is written inside the same transaction.
pub fn run_batch(
    conn: &mut Connection,
    batch: &Batch,
    options: &BatchOptions,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let mut stats = ImportStats {
        total_records: batch.records.len() as u64,
        ..Default::default()
    };

    let mut tx = conn.transaction()?;

    if !batch.brands.is_empty() {
        if let Some(p) = progress {
            p.on_phase(&format!("Importing {} brands", batch.brands.len()));
        }
        for brand in &batch.brands {
            if resolve_brand(&tx, Some(brand))?.is_some() {
                stats.brands += 1;
            }
        }
    }

    if let Some(p) = progress {
        p.on_phase(&format!(
            "Importing {} hotels from {}",
            batch.records.len(),
            batch.source_name
        ));
    }

    let total = batch.records.len();
    for (i, record) in batch.records.iter().enumerate() {
        let label = record.label();
        match options.failure_policy {
            FailurePolicy::FailFast => {
                let outcome = import_record(&tx, record, options)?;
                stats.record(&outcome, &label);
            }
            FailurePolicy::SkipAndContinue => {
                let sp = tx.savepoint()?;
                match import_record(&sp, record, options) {
                    Ok(outcome) => {
                        sp.commit()?;
                        stats.record(&outcome, &label);
                    }
                    Err(e) => {
                        // Dropping the savepoint rolls this record back.
                        drop(sp);
                        log::warn!("Skipped {label}: {e}");
                        stats.skipped += 1;
                    }
                }
            }
        }

        if let Some(p) = progress {
            p.on_record(i + 1, total, &label);
        }
    }

    log_import(&tx, batch, options, &stats)?;
    tx.commit()?;

    if let Some(p) = progress {
        p.on_complete(&format!(
            "Imported {} of {} hotels ({} skipped)",
            stats.imported, stats.total_records, stats.skipped
        ));
    }

    Ok(stats)
}

/// Normalize, resolve, and upsert one record.
fn import_record(
    conn: &Connection,
    record: &RawRecord,
    options: &BatchOptions,
) -> Result<UpsertOutcome, ImportError> {
    let record = record.normalize()?;
    let brand_id = resolve_brand(conn, record.brand.as_deref())?;
    upsert_record(conn, &record, brand_id, &options.on_conflict, options.coercion)
}

fn log_import(
    conn: &Connection,
    batch: &Batch,
    options: &BatchOptions,
    stats: &ImportStats,
) -> Result<(), ImportError> {
    let entry = ImportLog {
        id: 0,
        source_type: options.source_type.clone(),
        source_name: batch.source_name.clone(),
        imported_at: now_rfc3339(),
        records_created: stats.hotels_created as i64,
        records_updated: stats.hotels_updated as i64,
        records_skipped: stats.skipped as i64,
    };
    operations::insert_import_log(conn, &entry)?;
    Ok(())
}

// ── Entry points ────────────────────────────────────────────────────────────

/// Import a JSON document with the JSON defaults (fail fast, strict values).
pub fn import_json_str(
    conn: &mut Connection,
    source_name: &str,
    content: &str,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let batch = Batch::from_json_str(source_name, content)?;
    run_batch(conn, &batch, &BatchOptions::for_format(SourceFormat::Json), progress)
}

/// Import tabular text with the tabular defaults (skip bad rows, lenient values).
pub fn import_tabular_str(
    conn: &mut Connection,
    source_name: &str,
    content: &str,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let batch = Batch::from_tabular_str(source_name, content)?;
    run_batch(
        conn,
        &batch,
        &BatchOptions::for_format(SourceFormat::Tabular),
        progress,
    )
}

/// Import a file with the defaults of its format.
pub fn import_file(
    conn: &mut Connection,
    path: &Path,
    format: Option<SourceFormat>,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let batch = Batch::read(path, format)?;
    run_batch(conn, &batch, &BatchOptions::for_format(batch.format), progress)
}

/// Open the database at `db_path`, import one file, and close it again.
///
/// Failure to open the database is a [`ImportError::Resource`].
pub fn import_into(
    db_path: &Path,
    file: &Path,
    format: Option<SourceFormat>,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let mut conn = open_database(db_path)?;
    import_file(&mut conn, file, format, progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("data/hotels.JSON")),
            Some(SourceFormat::Json)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("hotels.csv")),
            Some(SourceFormat::Tabular)
        );
        assert_eq!(SourceFormat::from_path(Path::new("hotels.xlsx")), None);
        assert_eq!(SourceFormat::from_path(Path::new("hotels")), None);
    }

    #[test]
    fn json_batch_shape_errors() {
        assert!(matches!(
            Batch::from_json_str("x", "{not json"),
            Err(ImportError::Format(_))
        ));
        assert!(matches!(
            Batch::from_json_str("x", "[1, 2]"),
            Err(ImportError::Format(_))
        ));
        assert!(matches!(
            Batch::from_json_str("x", r#"{"hotels": {"name": "A"}}"#),
            Err(ImportError::Format(_))
        ));
        assert!(matches!(
            Batch::from_json_str("x", r#"{"brands": [1]}"#),
            Err(ImportError::Format(_))
        ));
    }

    #[test]
    fn json_batch_keys_are_optional() {
        let batch = Batch::from_json_str("x", "{}").unwrap();
        assert!(batch.brands.is_empty());
        assert!(batch.records.is_empty());
    }

    #[test]
    fn default_options_per_format() {
        let json = BatchOptions::for_format(SourceFormat::Json);
        assert_eq!(json.failure_policy, FailurePolicy::FailFast);
        assert_eq!(json.coercion, Coercion::Strict);

        let csv = BatchOptions::for_format(SourceFormat::Tabular);
        assert_eq!(csv.failure_policy, FailurePolicy::SkipAndContinue);
        assert_eq!(csv.coercion, Coercion::Lenient);
        assert_eq!(csv.on_conflict, ConflictFields::file_import());
    }
}
