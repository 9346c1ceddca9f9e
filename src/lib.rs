//! CSV user import: upload, column mapping, per-row persistence.
//!
//! Flow:
//! - Upload bytes -> [`parse::parse_csv_stream`] -> [`parse::ParsedCsv`]
//!   (`;`-delimited, first row is the header row).
//! - Operator maps the five target fields to CSV columns via
//!   [`mapping::FieldMapping`] ("Ignore" skips a field).
//! - [`workflow::ImportSession::commit`] builds one [`model::User`] with an
//!   owned [`model::Address`] per data row and saves each through a
//!   [`store::UserStore`], aborting on the first store failure.

mod io;
pub mod mapping;
pub mod model;
pub mod parse;
pub mod store;
mod transcode;
pub mod workflow;

pub use crate::io::{build_upload_reader, reader_from_path, UploadMeta};
pub use crate::mapping::{FieldMapping, TargetField, IGNORE, TARGET_OPTIONS};
pub use crate::model::{Address, User};
pub use crate::parse::{parse_csv_stream, HeaderIndex, ParsedCsv};
pub use crate::store::{JsonlStore, MemoryStore, StoreError, UserStore};
pub use crate::workflow::{ImportOutcome, ImportSession};

use thiserror::Error;

/// Error type returned by this crate.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The uploaded bytes could not be decoded or split into rows.
    #[error("unable to load CSV: {0}")]
    Parse(#[from] csv_async::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A row failed to save; the commit loop aborted. The failing row is
    /// logged, the operator-visible result stays generic.
    #[error("import failed: not all users could be saved")]
    Persistence(#[source] crate::store::StoreError),
}

pub type ImportResult<T> = std::result::Result<T, ImportError>;
