// hallticket-pdf: Generate exam admission tickets for a roster of candidates

pub mod archive;
pub mod assets;
pub mod batch;
pub mod context;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod record;
pub mod render;
pub mod reproducible;
pub mod roster;

pub use context::{RenderContext, SubjectSource};
pub use error::{RecordError, RenderError};
pub use record::{CandidateRecord, RawRecord};
pub use render::{OutputDocument, TicketLayoutEngine};
