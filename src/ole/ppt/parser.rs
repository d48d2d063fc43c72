//! Top-level .ppt parsing: streams in, normalized presentation out.

use super::assemble::SlideAssembler;
use super::current_user::CurrentUser;
use super::scan::scan_unicode_strings;
use super::walker::{ParseResult, walk_stream};
use crate::model::{FileType, Presentation};
use crate::ole::consts::{
    STREAM_CURRENT_USER, STREAM_PICTURES, STREAM_POWERPOINT_DOCUMENT,
    STREAM_SUMMARY_INFORMATION,
};
use crate::ole::{OleError, OleFile};
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Cursor;

/// Parse a legacy PowerPoint file.
///
/// Total: every input, including one that is not a compound file at all,
/// yields a presentation. Failures degrade stepwise - a broken container
/// falls back to a raw Unicode scan of the bytes, and a walk that produces
/// no valid text yields the no-content slide.
pub fn parse(
    bytes: &[u8],
    file_name: &str,
    file_size: u64,
    modified: Option<DateTime<Utc>>,
) -> Presentation {
    let mut pres = Presentation::new(file_name, file_size, FileType::Ppt);
    let mut result = ParseResult::default();

    match OleFile::open(Cursor::new(bytes)) {
        Ok(mut ole) => {
            pres.metadata = ole.property_metadata();
            check_current_user(&mut ole, file_name);

            match ole.open_stream(&[STREAM_POWERPOINT_DOCUMENT]) {
                Ok(document) => {
                    walk_stream(&document, &mut result);
                },
                Err(_) => {
                    // Also try the dual-storage layout some converters emit.
                    match ole.open_stream(&["PP97_DUALSTORAGE", STREAM_POWERPOINT_DOCUMENT]) {
                        Ok(document) => walk_stream(&document, &mut result),
                        Err(_) => {
                            log::warn!(
                                "{}: no PowerPoint Document stream, scanning raw bytes",
                                file_name
                            );
                            result.texts = scan_unicode_strings(bytes);
                        },
                    }
                },
            }

            // Blips usually live in the Pictures stream rather than inline.
            if let Ok(pictures) = ole.open_stream(&[STREAM_PICTURES]) {
                walk_stream(&pictures, &mut result);
            }

            if !ole.exists(&[STREAM_SUMMARY_INFORMATION]) {
                log::debug!("{}: no SummaryInformation stream", file_name);
            }
        },
        Err(OleError::NotOleFile) => {
            log::warn!("{}: not a compound file, scanning raw bytes", file_name);
            result.texts = scan_unicode_strings(bytes);
        },
        Err(e) => {
            log::warn!("{}: compound file unreadable ({}), scanning raw bytes", file_name, e);
            result.texts = scan_unicode_strings(bytes);
        },
    }

    if let Some(format) = result.presentation_format.take() {
        pres.metadata.presentation_format = Some(format);
    }
    if pres.metadata.modified.is_none()
        && let Some(mtime) = modified
    {
        pres.metadata.modified = Some(mtime.to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    pres.slides = SlideAssembler::default().assemble(&result);
    pres.media = result.media;
    pres.finalize();
    pres
}

/// Validate the `Current User` stream when present. An encrypted header
/// token explains empty extraction results, so it is logged prominently.
fn check_current_user<R: std::io::Read + std::io::Seek>(ole: &mut OleFile<R>, file_name: &str) {
    let Ok(stream) = ole.open_stream(&[STREAM_CURRENT_USER]) else {
        log::debug!("{}: no Current User stream", file_name);
        return;
    };
    match CurrentUser::parse(&stream) {
        Some(cu) if cu.encrypted => {
            log::warn!("{}: presentation is encrypted, text extraction will fail", file_name);
        },
        Some(_) => {},
        None => {
            log::warn!("{}: unrecognized Current User header", file_name);
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_yields_diagnostic_presentation() {
        let noise: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
        let pres = parse(&noise, "noise.ppt", noise.len() as u64, None);
        assert!(!pres.slides.is_empty());
        assert_eq!(pres.metadata.total_slides as usize, pres.slides.len());
        for (i, slide) in pres.slides.iter().enumerate() {
            assert_eq!(slide.slide_number as usize, i + 1);
        }
    }

    #[test]
    fn test_empty_input() {
        let pres = parse(&[], "empty.ppt", 0, None);
        assert_eq!(pres.slides.len(), 1);
        assert_eq!(pres.slides[0].title, "No Content Found");
    }

    #[test]
    fn test_mtime_fills_missing_modified() {
        let mtime = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let pres = parse(&[], "empty.ppt", 0, Some(mtime));
        assert_eq!(pres.metadata.modified.as_deref(), Some("2024-05-01T10:00:00Z"));
    }
}
