// Batch driver: one ticket per roster row. A bad row is recorded and skipped;
// it never stops the rest of the batch.

use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::assets::PhotoResolver;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::record::RawRecord;
use crate::render::TicketLayoutEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// 1-based position in the roster
    pub row: usize,
    pub seat_no: Option<String>,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub generated: Vec<PathBuf>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.generated.len() + self.failures.len()
    }
}

pub struct Batch<'a> {
    pub engine: TicketLayoutEngine,
    pub context: &'a RenderContext,
    pub photos: Option<&'a PhotoResolver>,
    pub out_dir: &'a Path,
}

impl Batch<'_> {
    pub fn run(&self, rows: Vec<RawRecord>) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, raw) in rows.into_iter().enumerate() {
            let row = index + 1;
            let seat_no = raw.seat_no.clone();

            match self.render_row(raw) {
                Ok(path) => {
                    info!(row, path = %path.display(), "generated ticket");
                    report.generated.push(path);
                }
                Err(e) => {
                    error!(row, seat_no = seat_no.as_deref().unwrap_or("unknown"), error = %e, "skipping record");
                    report.failures.push(BatchFailure {
                        row,
                        seat_no,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    fn render_row(&self, mut raw: RawRecord) -> Result<PathBuf, RenderError> {
        self.context.resolve_subjects(&mut raw);

        let has_photo = raw
            .photo_path
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());
        if !has_photo {
            if let (Some(photos), Some(seat_no)) = (self.photos, raw.seat_no.as_deref()) {
                raw.photo_path = photos
                    .resolve(seat_no.trim())
                    .map(|p| p.display().to_string());
            }
        }

        let record = raw.validate()?;
        self.engine
            .render_to_dir(&record, self.context, self.out_dir)
    }
}
