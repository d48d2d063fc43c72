//! Metadata extraction from OLE property streams.
//!
//! Decodes the `\x05SummaryInformation` and `\x05DocumentSummaryInformation`
//! streams ([MS-OLEPS]) into [`Metadata`] fields. The two streams use
//! different property-ID tables: ids 2, 4, 6 and 7 mean different things in
//! each FMTID, so each stream gets its own setter table and they are never
//! shared.

use super::consts::*;
use super::file::{OleError, OleFile};
use crate::model::Metadata;
use crate::ole::ppt::text::{decode_utf16le, decode_win1252, sanitize};
use std::collections::HashMap;
use std::io::{Read, Seek};

/// Upper bound on property sets per stream; anything larger is treated as
/// corruption and the stream is skipped.
const MAX_PROPERTY_SETS: u32 = 100;

/// Upper bound on properties per section.
const MAX_PROPERTIES: u32 = 1000;

/// A decoded property value. Only the types the extractor consumes are
/// represented; everything else is skipped at decode time.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    I4(i32),
    Text(String),
}

impl<R: Read + Seek> OleFile<R> {
    /// Extract metadata from the standard property streams.
    ///
    /// Absent streams and per-property decode failures are tolerated; the
    /// result carries whatever fields could be read.
    pub fn property_metadata(&mut self) -> Metadata {
        let mut metadata = Metadata::default();

        if let Ok(data) = self.open_stream(&[STREAM_SUMMARY_INFORMATION]) {
            match parse_property_stream(&data) {
                Ok(props) => apply_summary_information(&mut metadata, &props),
                Err(e) => log::debug!("SummaryInformation decode failed: {}", e),
            }
        }

        if let Ok(data) = self.open_stream(&[STREAM_DOCUMENT_SUMMARY_INFORMATION]) {
            match parse_property_stream(&data) {
                Ok(props) => apply_document_summary_information(&mut metadata, &props),
                Err(e) => log::debug!("DocumentSummaryInformation decode failed: {}", e),
            }
        }

        metadata
    }
}

/// Parse the first property set of a property stream into an id → value map.
///
/// Stream layout: `ByteOrder(2) Version(2) OSVersion(4) CLSID(16)
/// NumPropertySets(4)`, then per set `FMTID(16) Offset(4)`; at the offset a
/// section header `Size(4) NumProperties(4)` followed by
/// `(PropertyId, PropertyOffset)` pairs.
pub fn parse_property_stream(data: &[u8]) -> Result<HashMap<u32, PropertyValue>, OleError> {
    if data.len() < 48 {
        return Err(OleError::Property("stream shorter than header".to_string()));
    }

    let num_property_sets = read_u32(data, 24)?;
    if num_property_sets == 0 || num_property_sets > MAX_PROPERTY_SETS {
        return Err(OleError::Property(format!(
            "implausible property set count {}",
            num_property_sets
        )));
    }

    // First set only: FMTID at 28, section offset at 44.
    let section_start = read_u32(data, 44)? as usize;
    if section_start + 8 > data.len() {
        return Err(OleError::Property(
            "section offset past end of stream".to_string(),
        ));
    }

    let num_props = read_u32(data, section_start + 4)?.min(MAX_PROPERTIES);
    let mut properties = HashMap::new();

    for i in 0..num_props {
        let pair_offset = section_start + 8 + (i as usize) * 8;
        if pair_offset + 8 > data.len() {
            break;
        }

        let prop_id = match read_u32(data, pair_offset) {
            Ok(v) => v,
            Err(_) => break,
        };
        let value_offset = match read_u32(data, pair_offset + 4) {
            Ok(v) => section_start + v as usize,
            Err(_) => break,
        };

        // A bad offset or type spoils only this property.
        if let Some(value) = decode_property(data, value_offset) {
            properties.insert(prop_id, value);
        }
    }

    Ok(properties)
}

/// Decode one typed property value at `offset`.
///
/// The type field is a 32-bit value (u16 type plus u16 padding). Only
/// `VT_I4`, `VT_LPSTR` and `VT_LPWSTR` are decoded; other types yield `None`.
fn decode_property(data: &[u8], offset: usize) -> Option<PropertyValue> {
    let prop_type = read_u32(data, offset).ok()?;
    let body = offset + 4;

    match prop_type {
        VT_I4 => {
            let value = crate::common::binary::read_i32_le(data, body).ok()?;
            Some(PropertyValue::I4(value))
        },
        VT_LPSTR => {
            let len = read_u32(data, body).ok()? as usize;
            if body + 4 + len > data.len() {
                return None;
            }
            let text = decode_win1252(&data[body + 4..body + 4 + len]);
            Some(PropertyValue::Text(text))
        },
        VT_LPWSTR => {
            let chars = read_u32(data, body).ok()? as usize;
            let byte_len = chars.checked_mul(2)?;
            if body + 4 + byte_len > data.len() {
                return None;
            }
            let text = decode_utf16le(&data[body + 4..body + 4 + byte_len]);
            Some(PropertyValue::Text(text))
        },
        _ => None,
    }
}

/// Setter table for the SummaryInformation FMTID.
fn apply_summary_information(metadata: &mut Metadata, props: &HashMap<u32, PropertyValue>) {
    set_text(&mut metadata.title, props.get(&2));
    set_text(&mut metadata.subject, props.get(&3));
    set_text(&mut metadata.creator, props.get(&4));
    set_text(&mut metadata.keywords, props.get(&5));
    set_text(&mut metadata.description, props.get(&6));
    set_text(&mut metadata.last_modified_by, props.get(&8));
    set_text(&mut metadata.revision, props.get(&9));
    set_text(&mut metadata.application, props.get(&18));
}

/// Setter table for the DocumentSummaryInformation FMTID.
///
/// Ids 4, 6 and 7 are integer counters here, unlike their string meanings in
/// SummaryInformation.
fn apply_document_summary_information(
    metadata: &mut Metadata,
    props: &HashMap<u32, PropertyValue>,
) {
    set_text(&mut metadata.category, props.get(&2));
    set_text(&mut metadata.manager, props.get(&14));
    set_text(&mut metadata.company, props.get(&15));
    set_count(&mut metadata.total_slides, props.get(&4));
    set_count(&mut metadata.total_paragraphs, props.get(&6));
    set_count(&mut metadata.total_words, props.get(&7));
}

fn set_text(field: &mut Option<String>, value: Option<&PropertyValue>) {
    if let Some(PropertyValue::Text(s)) = value {
        let clean = sanitize(s);
        if !clean.is_empty() {
            *field = Some(clean);
        }
    }
}

fn set_count(field: &mut u32, value: Option<&PropertyValue>) {
    if let Some(PropertyValue::I4(v)) = value
        && *v > 0
    {
        *field = *v as u32;
    }
}

#[inline]
fn read_u32(data: &[u8], offset: usize) -> Result<u32, OleError> {
    crate::common::binary::read_u32_le(data, offset)
        .map_err(|e| OleError::Property(e.to_string()))
}
