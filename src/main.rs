// hallticket-pdf: Generate exam admission tickets for a roster of candidates

use clap::Parser;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use hallticket_pdf::archive::{default_archive_name, write_archive};
use hallticket_pdf::assets::PhotoResolver;
use hallticket_pdf::batch::Batch;
use hallticket_pdf::context::DEFAULT_DEPARTMENT;
use hallticket_pdf::error::{ArchiveError, RosterError};
use hallticket_pdf::roster::{load_roster, parse_subject_lines};
use hallticket_pdf::{RenderContext, SubjectSource, TicketLayoutEngine};

/// Logo picked up from the working directory when `--logo` is not given
const DEFAULT_LOGO: &str = "logo.jpg";

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error("Failed to read subjects file {path}: {source}")]
    SubjectsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid log filter: {0}")]
    Logging(String),
    #[error("No hall tickets could be generated ({0} records failed)")]
    NothingGenerated(usize),
}

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate exam hall tickets (two copies per page) from a roster")]
struct Args {
    /// Candidate roster (.csv or .json) with Seat No, Exam No, Name, Date,
    /// Exam Center and optionally Subjects Applied / Photo Path columns
    roster: PathBuf,

    /// Department name shown in the ticket header
    #[arg(short, long, default_value = DEFAULT_DEPARTMENT)]
    department: String,

    /// Institution logo image (defaults to ./logo.jpg when present)
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Subject for every candidate, overriding the roster (repeatable)
    #[arg(short, long = "subject", conflicts_with = "subjects_file")]
    subjects: Vec<String>,

    /// File with one subject per line, overriding the roster
    #[arg(long)]
    subjects_file: Option<PathBuf>,

    /// Directory of candidate photos named <Seat No>.<jpg|jpeg|png|gif|bmp>
    #[arg(long)]
    photos: Option<PathBuf>,

    /// Output directory for generated tickets
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Also bundle the generated tickets into a zip archive
    #[arg(long)]
    zip: bool,

    /// Archive file name (defaults to hall_tickets_<timestamp>.zip)
    #[arg(long, requires = "zip")]
    zip_name: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    init_logging(&args.log_level)?;

    let rows = load_roster(&args.roster)?;
    let subject_source = resolve_subject_source(&args)?;
    let logo = resolve_logo(args.logo.as_deref());

    let context = RenderContext::new(args.department.clone())
        .with_logo(logo)
        .with_subjects(subject_source);

    std::fs::create_dir_all(&args.output_dir).map_err(|source| AppError::OutputDir {
        path: args.output_dir.display().to_string(),
        source,
    })?;

    let photos = args.photos.as_ref().map(PhotoResolver::new);
    let batch = Batch {
        engine: TicketLayoutEngine::new(),
        context: &context,
        photos: photos.as_ref(),
        out_dir: &args.output_dir,
    };

    let total = rows.len();
    let report = batch.run(rows);

    for path in &report.generated {
        println!("✓ Generated: {}", path.display());
    }
    for failure in &report.failures {
        println!(
            "✗ Row {} ({}): {}",
            failure.row,
            failure.seat_no.as_deref().unwrap_or("unknown"),
            failure.reason
        );
    }

    if total > 0 && report.generated.is_empty() {
        return Err(AppError::NothingGenerated(report.failures.len()));
    }

    println!("Generated {} of {} hall tickets", report.generated.len(), total);
    println!("  Department: {}", context.department_display());
    match &context.logo_path {
        Some(logo) => println!("  Logo: {}", logo.display()),
        None => println!("  Logo: none"),
    }
    if let SubjectSource::Override(subjects) = &context.subject_source {
        println!("  Subjects: {}", subjects);
    }
    println!("  Output: {}", args.output_dir.display());

    if args.zip {
        let name = args.zip_name.clone().unwrap_or_else(default_archive_name);
        let zip_path = args.output_dir.join(name);
        let entries = write_archive(&report.generated, &zip_path)?;
        println!("  Archive: {} ({} files)", zip_path.display(), entries);
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn init_logging(level: &str) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| AppError::Logging(e.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

fn resolve_subject_source(args: &Args) -> Result<SubjectSource, AppError> {
    let text = match &args.subjects_file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| AppError::SubjectsFile {
            path: path.display().to_string(),
            source,
        })?,
        None => args.subjects.join("\n"),
    };

    Ok(match parse_subject_lines(&text) {
        Some(subjects) => SubjectSource::Override(subjects),
        None => SubjectSource::Record,
    })
}

/// An explicit logo that does not exist is dropped with a warning; without
/// one, `logo.jpg` in the working directory is used if present.
fn resolve_logo(requested: Option<&Path>) -> Option<PathBuf> {
    match requested {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(path) => {
            warn!(path = %path.display(), "logo not found, continuing without logo");
            None
        }
        None => {
            let fallback = Path::new(DEFAULT_LOGO);
            fallback.exists().then(|| fallback.to_path_buf())
        }
    }
}
