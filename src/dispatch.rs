//! Format dispatch.
//!
//! Selects a parser by file extension, falling back to content sniffing when
//! the extension is unhelpful. All entry points are total: they always
//! return a presentation.

use crate::model::{FileType, Presentation};
use crate::ole::is_ole_file;
use chrono::{DateTime, Utc};

/// ZIP local-file-header signature.
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

/// Parse a presentation, selecting the parser by extension
/// (case-insensitive `.ppt` / `.pptx`). Files with any other name are
/// sniffed by signature; unrecognizable input yields the diagnostic error
/// presentation.
pub fn parse(
    bytes: &[u8],
    file_name: &str,
    file_size: u64,
    modified: Option<DateTime<Utc>>,
) -> Presentation {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pptx") {
        return parse_pptx(bytes, file_name, file_size, modified);
    }
    if lower.ends_with(".ppt") {
        return parse_ppt(bytes, file_name, file_size, modified);
    }

    if bytes.starts_with(ZIP_MAGIC) {
        log::debug!("{}: unknown extension, ZIP signature found", file_name);
        return parse_pptx(bytes, file_name, file_size, modified);
    }
    if is_ole_file(bytes) {
        log::debug!("{}: unknown extension, compound file signature found", file_name);
        return parse_ppt(bytes, file_name, file_size, modified);
    }

    Presentation::diagnostic_error(
        file_name,
        file_size,
        FileType::Ppt,
        format!("Unsupported file type: {}", file_name),
    )
}

/// Parse a legacy .ppt presentation. Never fails.
pub fn parse_ppt(
    bytes: &[u8],
    file_name: &str,
    file_size: u64,
    modified: Option<DateTime<Utc>>,
) -> Presentation {
    crate::ole::ppt::parse(bytes, file_name, file_size, modified)
}

/// Parse a modern .pptx presentation. Never fails.
pub fn parse_pptx(
    bytes: &[u8],
    file_name: &str,
    file_size: u64,
    modified: Option<DateTime<Utc>>,
) -> Presentation {
    crate::ooxml::pptx::parse(bytes, file_name, file_size, modified)
}
