use std::path::PathBuf;

use crate::record::RawRecord;

pub const DEFAULT_DEPARTMENT: &str = "INFORMATION SCIENCE ENGINEERING";

/// Where each record's subject list comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubjectSource {
    /// The roster's own "Subjects Applied" column.
    #[default]
    Record,
    /// One comma-separated list applied to every record.
    Override(String),
}

/// Per-batch rendering configuration, shared by every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub department_name: String,
    pub logo_path: Option<PathBuf>,
    pub subject_source: SubjectSource,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(DEFAULT_DEPARTMENT)
    }
}

impl RenderContext {
    pub fn new(department_name: impl Into<String>) -> Self {
        Self {
            department_name: department_name.into(),
            logo_path: None,
            subject_source: SubjectSource::Record,
        }
    }

    pub fn with_logo(mut self, logo_path: Option<PathBuf>) -> Self {
        self.logo_path = logo_path;
        self
    }

    pub fn with_subjects(mut self, subject_source: SubjectSource) -> Self {
        self.subject_source = subject_source;
        self
    }

    pub fn department_display(&self) -> String {
        self.department_name.to_uppercase()
    }

    /// Applies the batch-wide subject override, if any, to a raw row.
    pub fn resolve_subjects(&self, raw: &mut RawRecord) {
        if let SubjectSource::Override(subjects) = &self.subject_source {
            raw.subjects_applied = Some(subjects.clone());
        }
    }
}
