//! Streaming parse of an uploaded CSV byte stream into rows.

use std::collections::HashMap;

use csv_async::{AsyncReaderBuilder, StringRecord};
use tokio::io::AsyncRead;

use crate::ImportResult;

/// Cell separator used by uploaded files.
pub const DELIMITER: u8 = b';';

/// Lookup from header cell text to its zero-based column position.
/// Built once per upload; on duplicate headers the last occurrence wins.
pub type HeaderIndex = HashMap<String, usize>;

/// One parsed upload: the header row plus the data rows, in file order.
/// Discarded and rebuilt whenever a new file is uploaded.
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedCsv {
    /// Walk the header row once, assigning each header its column position.
    /// An empty header row yields an empty index and every later lookup
    /// resolves to "not found".
    pub fn header_index(&self) -> HeaderIndex {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, h)| (h.clone(), col))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

/// Parse `;`-delimited UTF-8 CSV from any `AsyncRead`.
///
/// Rows may differ in width from the header row; short rows are kept as-is
/// and degrade to absent field values at resolve time. Decode or split
/// failures surface as [`crate::ImportError::Parse`] and leave no data
/// loaded.
pub async fn parse_csv_stream<R>(reader: R) -> ImportResult<ParsedCsv>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut rdr = AsyncReaderBuilder::new()
        .has_headers(true)
        .delimiter(DELIMITER)
        .flexible(true)
        .buffer_capacity(1 << 20)
        .create_reader(reader);

    let mut headers: Vec<String> = rdr.headers().await?.iter().map(str::to_string).collect();
    // Spreadsheet exports often carry a UTF-8 BOM; it lands on the first cell.
    if let Some(first) = headers.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while rdr.read_record(&mut record).await? {
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(ParsedCsv { headers, rows })
}

/// Turn a camelCase header into display text, e.g. `postCode` -> "Post Code".
pub fn display_header(header: &str) -> String {
    let mut out = String::with_capacity(header.len() + 4);
    let mut prev_lower = false;
    for (i, ch) in header.chars().enumerate() {
        if ch.is_uppercase() && prev_lower {
            out.push(' ');
        }
        if i == 0 || out.ends_with(' ') {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
    }
    out
}
