//! Upload plumbing: turn the opaque bytes of an uploaded file into an
//! `AsyncRead` of UTF-8 CSV text, undoing compression and charset on the way.

use std::path::Path;

use async_compression::tokio::bufread::{GzipDecoder, ZstdDecoder};
use tokio::fs::File;
use tokio::io::{AsyncRead, BufReader};
use tokio_util::codec::FramedRead;
use tokio_util::io::StreamReader;

use crate::transcode::CharsetDecoder;
use crate::ImportResult;

/// What the upload boundary told us about the file. All fields are
/// best-effort hints; absent hints mean plain UTF-8 CSV.
#[derive(Debug, Clone)]
pub struct UploadMeta {
    /// MIME type, e.g. "text/csv" or "application/gzip".
    pub content_type: String,
    /// Transfer encoding list, e.g. "gzip" or "zstd".
    pub content_encoding: String,
    /// Original file name, used as an extension fallback.
    pub file_name: String,
    /// Character encoding of the decompressed text.
    pub charset: &'static encoding_rs::Encoding,
}

impl Default for UploadMeta {
    fn default() -> Self {
        Self {
            content_type: String::new(),
            content_encoding: String::new(),
            file_name: String::new(),
            charset: encoding_rs::UTF_8,
        }
    }
}

impl UploadMeta {
    fn encoding_lists(&self, token: &str) -> bool {
        self.content_encoding
            .to_ascii_lowercase()
            .split(',')
            .any(|s| s.trim() == token)
    }

    fn is_gzip(&self) -> bool {
        self.encoding_lists("gzip")
            || matches!(
                self.content_type.to_ascii_lowercase().as_str(),
                "application/gzip" | "application/x-gzip"
            )
            || self.file_name.ends_with(".gz")
    }

    fn is_zstd(&self) -> bool {
        self.encoding_lists("zstd")
            || self.content_type.eq_ignore_ascii_case("application/zstd")
            || self.file_name.ends_with(".zst")
    }
}

/// Wrap raw upload bytes with decompression and UTF-8 transcoding as the
/// metadata demands. The result feeds straight into the CSV parser.
pub fn build_upload_reader<R>(raw: R, meta: &UploadMeta) -> impl AsyncRead + Unpin + Send
where
    R: AsyncRead + Unpin + Send + 'static,
{
    // Decompression choice: encoding header, then MIME type, then extension.
    let buf = BufReader::with_capacity(1 << 20, raw);
    let text: Box<dyn AsyncRead + Unpin + Send> = if meta.is_gzip() {
        Box::new(GzipDecoder::new(buf))
    } else if meta.is_zstd() {
        Box::new(ZstdDecoder::new(buf))
    } else {
        Box::new(buf)
    };

    // Transcode only when the charset is not already UTF-8.
    let utf8: Box<dyn AsyncRead + Unpin + Send> = if meta.charset == encoding_rs::UTF_8 {
        text
    } else {
        let framed = FramedRead::new(text, CharsetDecoder::new(meta.charset));
        Box::new(StreamReader::new(framed))
    };
    utf8
}

/// Open a local file as an upload, deriving metadata from its extension.
pub async fn reader_from_path(path: &Path) -> ImportResult<impl AsyncRead + Unpin + Send> {
    let file = File::open(path).await?;
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let mut meta = UploadMeta {
        file_name,
        ..Default::default()
    };
    match path.extension().and_then(|s| s.to_str()) {
        Some("gz") => {
            meta.content_type = "application/gzip".into();
            meta.content_encoding = "gzip".into();
        }
        Some("zst") => {
            meta.content_type = "application/zstd".into();
            meta.content_encoding = "zstd".into();
        }
        _ => meta.content_type = "text/csv".into(),
    }

    Ok(build_upload_reader(file, &meta))
}
