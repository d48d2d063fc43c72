//! Recursive record walker for the `PowerPoint Document` stream.
//!
//! The stream is a flat sequence of length-prefixed records; container
//! records nest further records in their body. The walker traverses this
//! structure depth-first, dispatching the atoms it understands and tracking
//! which `Slide` container the cursor is currently inside so decoded text
//! can be bucketed per slide.

use super::atoms;
use super::consts::RecordType;
use super::records::{HEADER_SIZE, RecordHeader};
use crate::model::Media;
use std::collections::BTreeMap;

/// Maximum recursion depth.
pub const MAX_DEPTH: usize = 50;

/// Maximum records visited per nesting level; bounds pathological streams.
pub const MAX_RECORDS_PER_LEVEL: usize = 100_000;

/// Maximum plausible single-record length (100 MB).
pub const MAX_RECORD_LEN: u32 = 100 * 1024 * 1024;

/// Mutable traversal state threaded through the recursion.
#[derive(Debug, Default)]
pub struct ParseState {
    /// Current nesting depth
    depth: usize,
    /// 1-based index of the `Slide` container the cursor is inside, or 0
    /// when outside any slide
    pub current_slide: u32,
}

/// Accumulator filled in while walking one or more record streams.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Every accepted string, in traversal order
    pub texts: Vec<String>,
    /// Accepted strings bucketed by slide index (1-based)
    pub slide_texts: BTreeMap<u32, Vec<String>>,
    /// Collected blips, in encounter order
    pub media: Vec<Media>,
    /// Running 1-based blip index used for synthesized names
    pub blip_count: usize,
    /// Slide dimensions from the document atom, as `"W x H inches"`
    pub presentation_format: Option<String>,
}

impl ParseResult {
    /// Record an accepted text string, attributing it to the current slide
    /// when the cursor is inside one.
    pub fn push_text(&mut self, text: String, current_slide: u32) {
        if current_slide > 0 {
            self.slide_texts
                .entry(current_slide)
                .or_default()
                .push(text.clone());
        }
        self.texts.push(text);
    }
}

/// Walk a complete record stream from the beginning.
pub fn walk_stream(data: &[u8], result: &mut ParseResult) {
    let mut state = ParseState::default();
    walk_region(data, 0, data.len(), &mut state, result);
}

/// Walk the records inside `[start, end)`.
fn walk_region(
    data: &[u8],
    start: usize,
    end: usize,
    state: &mut ParseState,
    result: &mut ParseResult,
) {
    let mut pos = start;
    let mut visited = 0usize;

    while pos + HEADER_SIZE <= end {
        visited += 1;
        if visited > MAX_RECORDS_PER_LEVEL {
            log::warn!("record cap reached at depth {}, stopping level", state.depth);
            break;
        }

        let Some(header) = RecordHeader::parse(data, pos) else {
            break;
        };

        let body_start = pos + HEADER_SIZE;
        let remaining = end - body_start;
        let length = header.length as usize;

        if header.length > MAX_RECORD_LEN || length > remaining {
            // Implausible length; assume we lost framing and resync byte by
            // byte until a believable header appears.
            log::debug!(
                "implausible record length {} at offset {}, resyncing",
                header.length,
                pos
            );
            pos += 1;
            continue;
        }

        let body_end = body_start + length;
        atoms::dispatch(&header, &data[body_start..body_end], state, result);

        if header.is_container() && state.depth < MAX_DEPTH {
            if header.record_type == RecordType::Slide {
                state.current_slide += 1;
            }
            state.depth += 1;
            walk_region(data, body_start, body_end, state, result);
            state.depth -= 1;
        }

        pos = body_end;
    }
}
