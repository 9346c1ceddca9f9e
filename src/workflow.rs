//! One interactive import session: the parsed upload, the operator's
//! mapping state, and the sequential commit loop.

use tokio::io::AsyncRead;
use tracing::{debug, error, info};

use crate::mapping::{FieldMapping, TargetField, TARGET_OPTIONS};
use crate::model::{Address, User};
use crate::parse::{parse_csv_stream, HeaderIndex, ParsedCsv};
use crate::store::UserStore;
use crate::{ImportError, ImportResult};

/// Aggregate result of a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Number of users saved, one per data row.
    pub saved: usize,
}

/// State scoped to one uploaded file. A new upload replaces the session;
/// nothing accumulates across uploads.
#[derive(Debug, Default)]
pub struct ImportSession {
    csv: ParsedCsv,
    index: HeaderIndex,
    mapping: FieldMapping,
}

impl ImportSession {
    /// Parse an upload and start a session over it.
    pub async fn load<R>(reader: R) -> ImportResult<Self>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let csv = parse_csv_stream(reader).await?;
        info!(
            headers = csv.headers.len(),
            rows = csv.rows.len(),
            "CSV parsed"
        );
        Ok(Self::from_parsed(csv))
    }

    pub fn from_parsed(csv: ParsedCsv) -> Self {
        let index = csv.header_index();
        Self {
            csv,
            index,
            mapping: FieldMapping::new(),
        }
    }

    /// Header cells, for tabular display.
    pub fn headers(&self) -> &[String] {
        &self.csv.headers
    }

    /// Data rows (everything after the header row), in file order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.csv.rows
    }

    /// The option set offered by each of the five mapping selectors.
    pub fn target_options() -> &'static [&'static str] {
        &TARGET_OPTIONS
    }

    pub fn select(&mut self, field: TargetField, choice: impl Into<String>) {
        self.mapping.select(field, choice);
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Whether the save action should be enabled. Recomputed from the
    /// mapping state on every change; no message when false.
    pub fn is_ready(&self) -> bool {
        self.mapping.is_complete()
    }

    /// Build the entity pair for one data row. Unmapped, ignored, and
    /// unresolvable fields come out absent.
    pub fn build_user(&self, row: &[String]) -> User {
        let resolve = |field| self.mapping.resolve_cell(row, field, &self.index);
        let address = Address {
            street: resolve(TargetField::Street),
            post_code: resolve(TargetField::PostCode),
            country: resolve(TargetField::Country),
        };
        User {
            id: None,
            first_name: resolve(TargetField::FirstName),
            last_name: resolve(TargetField::LastName),
            address,
        }
    }

    /// Save every data row, strictly in order, one store call per row.
    ///
    /// The first failed save aborts the loop; remaining rows are not
    /// attempted and a single generic failure is returned. The failing
    /// row number and cause go to the log only.
    pub async fn commit<S: UserStore>(&self, store: &mut S) -> ImportResult<ImportOutcome> {
        for (i, row) in self.csv.rows.iter().enumerate() {
            let user = self.build_user(row);
            match store.save(user).await {
                Ok(saved) => debug!(row = i + 1, id = ?saved.id, "user saved"),
                Err(err) => {
                    error!(row = i + 1, cause = %err, "save failed, aborting import");
                    return Err(ImportError::Persistence(err));
                }
            }
        }
        let saved = self.csv.rows.len();
        info!(saved, "import committed");
        Ok(ImportOutcome { saved })
    }
}
