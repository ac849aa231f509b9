// Roster loading: CSV or JSON rows into `RawRecord`s, plus the batch-wide
// subject list.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

use crate::error::RosterError;
use crate::record::{
    RawRecord, DATE, EXAM_CENTER, EXAM_NO, NAME, PHOTO_PATH, REQUIRED_COLUMNS, SEAT_NO,
    SUBJECTS_APPLIED,
};

pub fn load_roster(path: &Path) -> Result<Vec<RawRecord>, RosterError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let io_error = |source| RosterError::Io {
        path: path.display().to_string(),
        source,
    };

    match extension.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).map_err(io_error)?;
            parse_csv(file)
        }
        "json" => {
            let content = std::fs::read_to_string(path).map_err(io_error)?;
            parse_json(&content)
        }
        other => Err(RosterError::UnsupportedFormat(other.to_string())),
    }
}

// ============================================================================
// CSV
// ============================================================================

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Seat No", default, deserialize_with = "empty_string_as_none")]
    seat_no: Option<String>,
    #[serde(rename = "Exam No", default, deserialize_with = "empty_string_as_none")]
    exam_no: Option<String>,
    #[serde(rename = "Name", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(rename = "Date", default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(rename = "Exam Center", default, deserialize_with = "empty_string_as_none")]
    exam_center: Option<String>,
    #[serde(
        rename = "Subjects Applied",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    subjects_applied: Option<String>,
    #[serde(rename = "Photo Path", default, deserialize_with = "empty_string_as_none")]
    photo_path: Option<String>,
}

impl From<CsvRow> for RawRecord {
    fn from(row: CsvRow) -> Self {
        RawRecord {
            seat_no: row.seat_no,
            exam_no: row.exam_no,
            name: row.name,
            date: row.date,
            exam_center: row.exam_center,
            subjects_applied: row.subjects_applied,
            photo_path: row.photo_path,
        }
    }
}

/// Parses a headed CSV roster. Cells stay text, so seat numbers keep any
/// leading zeros.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(RosterError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<CsvRow>() {
        records.push(row?.into());
    }
    Ok(records)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

// ============================================================================
// JSON
// ============================================================================

/// Parses a JSON array of objects keyed by the roster column names.
/// Numbers are accepted where text is expected (`"Seat No": 1001`).
pub fn parse_json(content: &str) -> Result<Vec<RawRecord>, RosterError> {
    let rows: Vec<Map<String, Value>> = serde_json::from_str(content)?;
    Ok(rows.iter().map(record_from_json).collect())
}

fn record_from_json(row: &Map<String, Value>) -> RawRecord {
    let cell = |key: &str| row.get(key).and_then(json_cell);
    RawRecord {
        seat_no: cell(SEAT_NO),
        exam_no: cell(EXAM_NO),
        name: cell(NAME),
        date: cell(DATE),
        exam_center: cell(EXAM_CENTER),
        subjects_applied: cell(SUBJECTS_APPLIED),
        photo_path: cell(PHOTO_PATH),
    }
}

/// Integral floats below this magnitude convert to `i64` exactly.
const I64_EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;

fn json_cell(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < I64_EXACT_LIMIT => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    };
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

// ============================================================================
// Subjects
// ============================================================================

/// One subject per line, blank lines skipped, joined into the
/// comma-separated form the layout expects. `None` if nothing was given.
pub fn parse_subject_lines(text: &str) -> Option<String> {
    let subjects: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    (!subjects.is_empty()).then(|| subjects.join(", "))
}
