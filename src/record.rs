use std::path::PathBuf;

use crate::error::RecordError;
use crate::layout::MAX_SUBJECTS;

// ============================================================================
// Column Names
// ============================================================================

pub const SEAT_NO: &str = "Seat No";
pub const EXAM_NO: &str = "Exam No";
pub const NAME: &str = "Name";
pub const DATE: &str = "Date";
pub const EXAM_CENTER: &str = "Exam Center";
pub const SUBJECTS_APPLIED: &str = "Subjects Applied";
pub const PHOTO_PATH: &str = "Photo Path";

/// Columns a roster must carry. Subjects can come from a batch-wide
/// override instead, so they are checked per record.
pub const REQUIRED_COLUMNS: [&str; 5] = [SEAT_NO, EXAM_NO, NAME, DATE, EXAM_CENTER];

// ============================================================================
// Records
// ============================================================================

/// A roster row as read from disk. Every cell may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub seat_no: Option<String>,
    pub exam_no: Option<String>,
    pub name: Option<String>,
    pub date: Option<String>,
    pub exam_center: Option<String>,
    pub subjects_applied: Option<String>,
    pub photo_path: Option<String>,
}

/// A validated candidate, ready for layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    pub seat_no: String,
    pub exam_no: String,
    pub name: String,
    pub date: String,
    pub exam_center: String,
    pub subjects_applied: String,
    pub photo_path: Option<PathBuf>,
}

impl RawRecord {
    /// Checks required fields in column order and reports the first gap.
    pub fn validate(self) -> Result<CandidateRecord, RecordError> {
        let record = CandidateRecord {
            seat_no: required(self.seat_no, SEAT_NO)?,
            exam_no: required(self.exam_no, EXAM_NO)?,
            name: required(self.name, NAME)?,
            date: required(self.date, DATE)?,
            exam_center: required(self.exam_center, EXAM_CENTER)?,
            subjects_applied: required(self.subjects_applied, SUBJECTS_APPLIED)?,
            photo_path: non_blank(self.photo_path).map(PathBuf::from),
        };
        record.checked_subjects()?;
        Ok(record)
    }
}

impl CandidateRecord {
    /// Comma-separated subject labels, trimmed, blanks dropped.
    pub fn subjects(&self) -> Vec<&str> {
        self.subjects_applied
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Subjects, provided the list is non-empty and fits in one copy block.
    pub fn checked_subjects(&self) -> Result<Vec<&str>, RecordError> {
        let subjects = self.subjects();
        if subjects.is_empty() {
            return Err(RecordError::MissingField(SUBJECTS_APPLIED));
        }
        if subjects.len() > MAX_SUBJECTS {
            return Err(RecordError::TooManySubjects {
                count: subjects.len(),
                max: MAX_SUBJECTS,
            });
        }
        Ok(subjects)
    }

    pub fn output_file_name(&self) -> String {
        format!("hallticket_{}.pdf", self.seat_no)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RecordError> {
    non_blank(value).ok_or(RecordError::MissingField(field))
}
