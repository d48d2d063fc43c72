//! Atom decoders: leaf-record handlers invoked by the walker.

use super::consts::RecordType;
use super::records::RecordHeader;
use super::text::{decode_utf16le, decode_win1252, sanitize};
use super::validate::is_valid_text;
use super::walker::{ParseResult, ParseState};
use crate::common::binary::read_i32_le;
use crate::model::Media;

/// English Metric Units per inch.
const EMU_PER_INCH: f64 = 914_400.0;

/// JPEG and PNG blip bodies carry a 16-byte UID plus a tag byte before the
/// image payload.
const BITMAP_UID_LEN: usize = 17;

/// Metafile blip bodies carry a 16-byte UID before the payload.
const METAFILE_UID_LEN: usize = 16;

/// Metafile payloads at or below this size are headers without real content.
const MIN_METAFILE_PAYLOAD: usize = 100;

/// Decode one record body according to its type. Unknown types are ignored.
pub fn dispatch(header: &RecordHeader, body: &[u8], state: &ParseState, result: &mut ParseResult) {
    match header.record_type {
        RecordType::TextCharsAtom => {
            accept_text(decode_utf16le(body), state, result);
        },
        RecordType::TextBytesAtom => {
            accept_text(decode_win1252(body), state, result);
        },
        RecordType::CString => {
            // CStrings carry names and UI strings; the validator weeds out
            // the structural ones.
            accept_text(decode_utf16le(body), state, result);
        },
        RecordType::TextHeaderAtom => {
            // Four bytes of text type; documentary only.
            let _ = read_i32_le(body, 0);
        },
        RecordType::DocumentAtom => {
            decode_document_atom(body, result);
        },
        RecordType::BlipJpeg | RecordType::BlipJpeg2 => {
            collect_bitmap_blip(body, "jpg", result);
        },
        RecordType::BlipPng => {
            collect_bitmap_blip(body, "png", result);
        },
        RecordType::BlipEmf => {
            collect_metafile_blip(body, "emf", result);
        },
        RecordType::BlipWmf => {
            collect_metafile_blip(body, "wmf", result);
        },
        RecordType::BlipPict => {
            collect_metafile_blip(body, "pict", result);
        },
        RecordType::BlipDib => {
            collect_metafile_blip(body, "bmp", result);
        },
        RecordType::BlipTiff => {
            collect_metafile_blip(body, "tiff", result);
        },
        _ => {},
    }
}

/// Sanitize and validate a decoded string, recording it when it passes.
fn accept_text(raw: String, state: &ParseState, result: &mut ParseResult) {
    let clean = sanitize(&raw);
    if is_valid_text(&clean) {
        result.push_text(clean, state.current_slide);
    }
}

/// Decode the document atom's slide dimensions (EMUs) into a display string.
fn decode_document_atom(body: &[u8], result: &mut ParseResult) {
    let (Ok(width), Ok(height)) = (read_i32_le(body, 0), read_i32_le(body, 4)) else {
        return;
    };
    if width <= 0 || height <= 0 {
        return;
    }
    let w = width as f64 / EMU_PER_INCH;
    let h = height as f64 / EMU_PER_INCH;
    result.presentation_format = Some(format!("{:.1} x {:.1} inches", w, h));
}

/// Collect a JPEG/PNG blip: `[uid: 17 bytes][image bytes]`.
fn collect_bitmap_blip(body: &[u8], extension: &str, result: &mut ParseResult) {
    if body.len() <= BITMAP_UID_LEN {
        return;
    }
    push_blip(&body[BITMAP_UID_LEN..], extension, result);
}

/// Collect a metafile blip: `[uid: 16 bytes][payload]`. Tiny payloads are
/// skipped.
fn collect_metafile_blip(body: &[u8], extension: &str, result: &mut ParseResult) {
    if body.len() <= METAFILE_UID_LEN {
        return;
    }
    let payload = &body[METAFILE_UID_LEN..];
    if payload.len() <= MIN_METAFILE_PAYLOAD {
        return;
    }
    push_blip(payload, extension, result);
}

fn push_blip(payload: &[u8], extension: &str, result: &mut ParseResult) {
    result.blip_count += 1;
    let name = format!("image_{}.{}", result.blip_count, extension);
    result.media.push(Media::from_bytes(name, extension, payload));
    log::debug!("collected blip {} ({} bytes)", result.blip_count, payload.len());
}
