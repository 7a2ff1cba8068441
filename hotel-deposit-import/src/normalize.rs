//! Convert raw input records into [`HotelRecord`]s.
//!
//! JSON records arrive loosely typed (numbers where strings are expected,
//! policy fields either flat or nested under `policy`). Tabular records are
//! header-keyed string cells. Both end up in the same canonical shape; numeric
//! coercion of policy values is left to the upsert engine.

use std::collections::HashMap;

use hotel_deposit_catalog::types::{DEFAULT_COUNTRY, HotelRecord, RawPolicy, RawValue};
use hotel_deposit_catalog::hotel_slug;
use serde_json::{Map, Value};

use crate::error::ImportError;

/// One record as read from a source, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// An object from a JSON `hotels` array.
    Json(Map<String, Value>),
    /// A data row of a tabular file, keyed by lowercased header.
    Row {
        /// 1-based line number in the source file.
        line: u64,
        cells: HashMap<String, String>,
    },
}

impl RawRecord {
    /// Normalize into the canonical record shape.
    pub fn normalize(&self) -> Result<HotelRecord, ImportError> {
        match self {
            Self::Json(obj) => normalize_json(obj),
            Self::Row { cells, .. } => normalize_row(cells),
        }
    }

    /// A short description for log messages.
    pub fn label(&self) -> String {
        match self {
            Self::Json(obj) => json_text(obj, "name").unwrap_or_else(|| "<unnamed>".to_string()),
            Self::Row { line, cells } => {
                let name = cells.get("name").map_or("<unnamed>", String::as_str);
                format!("line {line}: {name}")
            }
        }
    }
}

// ── JSON ────────────────────────────────────────────────────────────────────

/// Normalize a JSON hotel object.
pub fn normalize_json(obj: &Map<String, Value>) -> Result<HotelRecord, ImportError> {
    let name = json_text(obj, "name")
        .ok_or_else(|| ImportError::validation("missing required field `name`"))?;
    let city = json_text(obj, "city");
    let slug = json_text(obj, "slug").unwrap_or_else(|| hotel_slug(&name, city.as_deref()));

    // Policy fields may be nested (admin payloads) or flat (import files).
    let policy_src = obj.get("policy").and_then(Value::as_object).unwrap_or(obj);
    let policy = match json_raw(policy_src, "deposit_amount")? {
        Some(deposit_amount) => Some(RawPolicy {
            deposit_amount,
            is_percentage: policy_src.get("is_percentage").is_some_and(json_truthy),
            hold_duration_days: json_raw(policy_src, "hold_duration_days")?,
            refund_terms: json_text(policy_src, "refund_terms"),
        }),
        None => None,
    };

    Ok(HotelRecord {
        brand: json_text(obj, "brand").or_else(|| json_text(obj, "brand_name")),
        address: json_text(obj, "address"),
        state: json_text(obj, "state"),
        zip: json_text(obj, "zip"),
        country: json_text(obj, "country").unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        phone: json_text(obj, "phone"),
        name,
        city,
        slug,
        policy,
    })
}

/// A string-ish field. Numbers are stringified; blanks and other types are absent.
fn json_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A numeric-ish field kept uncoerced.
fn json_raw(obj: &Map<String, Value>, key: &str) -> Result<Option<RawValue>, ImportError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(match n.as_i64() {
            Some(i) => Some(RawValue::Integer(i)),
            None => n.as_f64().map(RawValue::Float),
        }),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(RawValue::Text(s.clone()))),
        Some(other) => Err(ImportError::validation(format!(
            "`{key}` must be a number or a string, got {other}"
        ))),
    }
}

fn json_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => is_true_literal(s),
        _ => false,
    }
}

// ── Tabular ─────────────────────────────────────────────────────────────────

/// Normalize one header-keyed tabular row. Cells are already trimmed and
/// blank cells are absent.
pub fn normalize_row(cells: &HashMap<String, String>) -> Result<HotelRecord, ImportError> {
    let cell = |key: &str| cells.get(key).cloned();

    let name = cell("name").ok_or_else(|| ImportError::validation("missing required field `name`"))?;
    let city = cell("city");
    let slug = cell("slug").unwrap_or_else(|| hotel_slug(&name, city.as_deref()));

    let policy = cell("deposit_amount").map(|amount| RawPolicy {
        deposit_amount: RawValue::Text(amount),
        is_percentage: cells.get("is_percentage").is_some_and(|v| is_true_literal(v)),
        hold_duration_days: cell("hold_duration_days").map(RawValue::Text),
        refund_terms: cell("refund_terms"),
    });

    Ok(HotelRecord {
        brand: cell("brand"),
        address: cell("address"),
        state: cell("state"),
        zip: cell("zip"),
        country: cell("country").unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        phone: cell("phone"),
        name,
        city,
        slug,
        policy,
    })
}

/// Split tabular text into header-keyed rows.
///
/// The first non-blank line is the header (trimmed, lowercased) and must
/// name a `name` column. Later lines map positionally onto it; missing
/// trailing cells and blank cells are absent, extra cells are ignored, and
/// all-blank lines are skipped.
pub fn parse_tabular(content: &str) -> Result<Vec<RawRecord>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| ImportError::format(format!("unreadable row: {e}")))?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let Some(header) = &headers else {
            let parsed: Vec<String> = record.iter().map(|h| h.trim().to_lowercase()).collect();
            if !parsed.iter().any(|h| h == "name") {
                return Err(ImportError::format("header row has no `name` column"));
            }
            headers = Some(parsed);
            continue;
        };

        let mut cells = HashMap::new();
        for (key, value) in header.iter().zip(record.iter()) {
            let value = value.trim();
            if value.is_empty() {
                cells.remove(key);
            } else {
                cells.insert(key.clone(), value.to_string());
            }
        }
        let line = record.position().map_or(0, |p| p.line());
        rows.push(RawRecord::Row { line, cells });
    }

    if headers.is_none() {
        return Err(ImportError::format("file is empty"));
    }
    Ok(rows)
}

fn is_true_literal(s: &str) -> bool {
    s == "true" || s == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(record: &RawRecord) -> &HashMap<String, String> {
        match record {
            RawRecord::Row { cells, .. } => cells,
            RawRecord::Json(_) => panic!("expected a tabular row"),
        }
    }

    #[test]
    fn header_is_lowercased_and_trimmed() {
        let rows = parse_tabular(" Name , CITY\nBay Inn,Oakland\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(cells(&rows[0]).get("name").unwrap(), "Bay Inn");
        assert_eq!(cells(&rows[0]).get("city").unwrap(), "Oakland");
    }

    #[test]
    fn missing_trailing_cells_are_absent() {
        let rows = parse_tabular("name,city,brand\nBay Inn\n").unwrap();
        assert!(!cells(&rows[0]).contains_key("city"));
        assert!(!cells(&rows[0]).contains_key("brand"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let rows = parse_tabular("\nname\n\n  \nA\n\nB\n").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn quoted_commas_stay_in_one_cell() {
        let rows = parse_tabular("name,address\n\"Inn, The\",\"1 Main St, Apt 2\"\n").unwrap();
        assert_eq!(cells(&rows[0]).get("name").unwrap(), "Inn, The");
    }

    #[test]
    fn empty_file_is_a_format_error() {
        assert!(matches!(parse_tabular(""), Err(ImportError::Format(_))));
        assert!(matches!(parse_tabular("\n \n"), Err(ImportError::Format(_))));
    }

    #[test]
    fn header_without_name_is_a_format_error() {
        let err = parse_tabular("hotel,city\nA,B\n").unwrap_err();
        assert!(matches!(err, ImportError::Format(_)));
    }

    #[test]
    fn row_policy_flags() {
        let rows = parse_tabular(
            "name,deposit_amount,is_percentage\nA,10,1\nB,10,TRUE\nC,10,true\nD,,true\n",
        )
        .unwrap();
        let records: Vec<HotelRecord> = rows.iter().map(|r| r.normalize().unwrap()).collect();
        assert!(records[0].policy.as_ref().unwrap().is_percentage);
        assert!(!records[1].policy.as_ref().unwrap().is_percentage);
        assert!(records[2].policy.as_ref().unwrap().is_percentage);
        assert!(records[3].policy.is_none());
    }

    #[test]
    fn row_defaults() {
        let rows = parse_tabular("name,city\nGrand Hotel!!,Paris\n").unwrap();
        let record = rows[0].normalize().unwrap();
        assert_eq!(record.country, "USA");
        assert_eq!(record.slug, "grand-hotel-paris");
        assert!(record.policy.is_none());
    }

    #[test]
    fn row_without_name_fails_validation() {
        let rows = parse_tabular("name,city\n,Paris\n").unwrap();
        assert!(matches!(rows[0].normalize(), Err(ImportError::Validation(_))));
    }

    #[test]
    fn json_flat_policy() {
        let obj: Map<String, Value> = serde_json::from_str(
            r#"{"name": "Bay Inn", "city": "Oakland", "zip": 94607,
                "deposit_amount": 100, "is_percentage": false,
                "hold_duration_days": 3, "refund_terms": "At checkout"}"#,
        )
        .unwrap();
        let record = normalize_json(&obj).unwrap();
        assert_eq!(record.zip.as_deref(), Some("94607"));
        assert_eq!(record.slug, "bay-inn-oakland");
        let policy = record.policy.unwrap();
        assert_eq!(policy.deposit_amount, RawValue::Integer(100));
        assert_eq!(policy.hold_duration_days, Some(RawValue::Integer(3)));
        assert!(!policy.is_percentage);
    }

    #[test]
    fn json_nested_policy_and_brand_name() {
        let obj: Map<String, Value> = serde_json::from_str(
            r#"{"name": "Bay Inn", "brand_name": "Hilton",
                "policy": {"deposit_amount": "12.5", "is_percentage": true}}"#,
        )
        .unwrap();
        let record = normalize_json(&obj).unwrap();
        assert_eq!(record.brand.as_deref(), Some("Hilton"));
        let policy = record.policy.unwrap();
        assert_eq!(policy.deposit_amount, RawValue::Text("12.5".to_string()));
        assert!(policy.is_percentage);
        assert_eq!(policy.hold_duration_days, None);
    }

    #[test]
    fn json_explicit_slug_wins() {
        let obj: Map<String, Value> =
            serde_json::from_str(r#"{"name": "Bay Inn", "city": "Oakland", "slug": "custom"}"#)
                .unwrap();
        assert_eq!(normalize_json(&obj).unwrap().slug, "custom");
    }

    #[test]
    fn json_zero_amount_still_creates_policy() {
        let obj: Map<String, Value> =
            serde_json::from_str(r#"{"name": "Bay Inn", "deposit_amount": 0}"#).unwrap();
        assert!(normalize_json(&obj).unwrap().policy.is_some());
    }

    #[test]
    fn json_boolean_amount_is_rejected() {
        let obj: Map<String, Value> =
            serde_json::from_str(r#"{"name": "Bay Inn", "deposit_amount": true}"#).unwrap();
        assert!(matches!(normalize_json(&obj), Err(ImportError::Validation(_))));
    }

    #[test]
    fn json_missing_name_fails_validation() {
        let obj: Map<String, Value> = serde_json::from_str(r#"{"city": "Oakland"}"#).unwrap();
        assert!(matches!(normalize_json(&obj), Err(ImportError::Validation(_))));
    }
}
