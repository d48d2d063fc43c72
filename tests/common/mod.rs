//! Synthetic file builders shared by the integration tests.
//!
//! The PPTX builder writes a minimal OOXML package with the `zip` crate; the
//! PPT builder assembles an OLE compound file (512-byte sectors, FAT-only
//! streams) around a hand-built record stream.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

// ---------------------------------------------------------------------------
// PPTX
// ---------------------------------------------------------------------------

pub const DRAWING_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const PRESENTATION_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const RELS_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Write a ZIP package from (name, bytes) entries.
pub fn build_zip(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A slide part with an optional title placeholder and body paragraphs.
pub fn slide_part(title: Option<&str>, body: &[&str]) -> Vec<u8> {
    let title_shape = title
        .map(|t| {
            format!(
                r#"<p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
                t
            )
        })
        .unwrap_or_default();
    let body_paragraphs: String = body
        .iter()
        .map(|p| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", p))
        .collect();
    let body_shape = if body.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p:sp><p:nvSpPr><p:nvPr><p:ph type="body"/></p:nvPr></p:nvSpPr><p:txBody>{}</p:txBody></p:sp>"#,
            body_paragraphs
        )
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld xmlns:a="{}" xmlns:p="{}" xmlns:r="{}"><p:cSld><p:spTree>{}{}</p:spTree></p:cSld></p:sld>"#,
        DRAWING_NS, PRESENTATION_NS, RELS_NS, title_shape, body_shape
    )
    .into_bytes()
}

/// A notes part with the given paragraphs.
pub fn notes_part(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", p))
        .collect();
    format!(
        r#"<?xml version="1.0"?><p:notes xmlns:a="{}" xmlns:p="{}"><p:cSld><p:spTree><p:sp><p:txBody>{}</p:txBody></p:sp></p:spTree></p:cSld></p:notes>"#,
        DRAWING_NS, PRESENTATION_NS, body
    )
    .into_bytes()
}

// ---------------------------------------------------------------------------
// PPT record stream
// ---------------------------------------------------------------------------

pub const RT_DOCUMENT: u16 = 0x03E8;
pub const RT_DOCUMENT_ATOM: u16 = 0x03E9;
pub const RT_SLIDE: u16 = 0x03EE;
pub const RT_TEXT_CHARS_ATOM: u16 = 0x0FA0;
pub const RT_TEXT_BYTES_ATOM: u16 = 0x0FA8;
pub const RT_CSTRING: u16 = 0x0FBA;
pub const BLIP_JPEG: u16 = 0xF01D;
pub const BLIP_PNG: u16 = 0xF01E;

/// Encode a record with the 8-byte header.
pub fn record(version: u8, record_type: u16, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + body.len());
    out.extend_from_slice(&((version as u16) & 0x0F).to_le_bytes());
    out.extend_from_slice(&record_type.to_le_bytes());
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(body);
    out
}

/// An atom record (version 0).
pub fn atom(record_type: u16, body: &[u8]) -> Vec<u8> {
    record(0, record_type, body)
}

/// A container record (version 0xF).
pub fn container(record_type: u16, body: &[u8]) -> Vec<u8> {
    record(0x0F, record_type, body)
}

/// UTF-16LE bytes of a string.
pub fn utf16(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

// ---------------------------------------------------------------------------
// OLE property stream
// ---------------------------------------------------------------------------

pub const VT_I4: u32 = 3;
pub const VT_LPSTR: u32 = 30;
pub const VT_LPWSTR: u32 = 31;

/// Build a property stream with one section of (id, type, raw value bytes).
pub fn property_stream(props: &[(u32, u32, Vec<u8>)]) -> Vec<u8> {
    let mut data = vec![0u8; 48];
    data[0] = 0xFE;
    data[1] = 0xFF;
    data[24..28].copy_from_slice(&1u32.to_le_bytes());
    data[44..48].copy_from_slice(&48u32.to_le_bytes());

    let header_len = 8 + props.len() * 8;
    let mut values: Vec<u8> = Vec::new();
    let mut pairs: Vec<u8> = Vec::new();
    for (id, vt, raw) in props {
        pairs.extend_from_slice(&id.to_le_bytes());
        pairs.extend_from_slice(&((header_len + values.len()) as u32).to_le_bytes());
        values.extend_from_slice(&vt.to_le_bytes());
        values.extend_from_slice(raw);
    }

    data.extend_from_slice(&((header_len + values.len()) as u32).to_le_bytes());
    data.extend_from_slice(&(props.len() as u32).to_le_bytes());
    data.extend_from_slice(&pairs);
    data.extend_from_slice(&values);
    data
}

/// A VT_LPWSTR payload (character count + UTF-16LE + terminator).
pub fn lpwstr(text: &str) -> Vec<u8> {
    let units: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
    let mut raw = (units.len() as u32).to_le_bytes().to_vec();
    for unit in units {
        raw.extend_from_slice(&unit.to_le_bytes());
    }
    raw
}

// ---------------------------------------------------------------------------
// OLE compound file
// ---------------------------------------------------------------------------

const SECTOR: usize = 512;
const ENDOFCHAIN: u32 = 0xFFFFFFFE;
const FREESECT: u32 = 0xFFFFFFFF;
const FATSECT: u32 = 0xFFFFFFFD;
const NOSTREAM: u32 = 0xFFFFFFFF;

/// Assemble an OLE compound file holding the given root-level streams.
///
/// Single-FAT-sector layout (enough for test payloads): sector 0 is the FAT,
/// followed by directory sectors, followed by each stream's sectors. The
/// mini-stream cutoff is set to zero so every stream reads through the FAT.
pub fn build_cfb(streams: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let dir_entries = 1 + streams.len();
    let dir_sectors = dir_entries.div_ceil(4);

    let mut stream_sector_counts = Vec::new();
    for (_, data) in streams {
        stream_sector_counts.push(data.len().div_ceil(SECTOR).max(1));
    }
    let total_sectors = 1 + dir_sectors + stream_sector_counts.iter().sum::<usize>();
    assert!(total_sectors <= SECTOR / 4, "payload too large for one FAT sector");

    // FAT
    let mut fat = vec![FREESECT; SECTOR / 4];
    fat[0] = FATSECT;
    let dir_start = 1u32;
    for i in 0..dir_sectors {
        fat[1 + i] = if i + 1 == dir_sectors {
            ENDOFCHAIN
        } else {
            dir_start + i as u32 + 1
        };
    }
    let mut next_free = 1 + dir_sectors;
    let mut stream_starts = Vec::new();
    for count in &stream_sector_counts {
        stream_starts.push(next_free as u32);
        for i in 0..*count {
            fat[next_free + i] = if i + 1 == *count {
                ENDOFCHAIN
            } else {
                (next_free + i + 1) as u32
            };
        }
        next_free += count;
    }

    // Directory
    let mut dir = Vec::new();
    let root_child = if streams.is_empty() { NOSTREAM } else { 1 };
    dir.extend(directory_entry("Root Entry", 5, root_child, NOSTREAM, ENDOFCHAIN, 0));
    for (i, ((name, data), start)) in streams.iter().zip(&stream_starts).enumerate() {
        let right = if i + 1 < streams.len() {
            (i + 2) as u32
        } else {
            NOSTREAM
        };
        dir.extend(directory_entry(name, 2, NOSTREAM, right, *start, data.len() as u64));
    }
    dir.resize(dir_sectors * SECTOR, 0);

    // Header
    let mut header = Vec::with_capacity(SECTOR);
    header.extend_from_slice(b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1");
    header.extend_from_slice(&[0u8; 16]); // clsid
    header.extend_from_slice(&0x003Eu16.to_le_bytes()); // minor version
    header.extend_from_slice(&3u16.to_le_bytes()); // dll version
    header.extend_from_slice(&0xFFFEu16.to_le_bytes()); // byte order
    header.extend_from_slice(&9u16.to_le_bytes()); // sector shift
    header.extend_from_slice(&6u16.to_le_bytes()); // mini sector shift
    header.extend_from_slice(&[0u8; 6]); // reserved
    header.extend_from_slice(&0u32.to_le_bytes()); // num dir sectors (v3: 0)
    header.extend_from_slice(&1u32.to_le_bytes()); // num FAT sectors
    header.extend_from_slice(&dir_start.to_le_bytes()); // first dir sector
    header.extend_from_slice(&0u32.to_le_bytes()); // transaction signature
    header.extend_from_slice(&0u32.to_le_bytes()); // mini stream cutoff: FAT-only
    header.extend_from_slice(&ENDOFCHAIN.to_le_bytes()); // first minifat sector
    header.extend_from_slice(&0u32.to_le_bytes()); // num minifat sectors
    header.extend_from_slice(&ENDOFCHAIN.to_le_bytes()); // first difat sector
    header.extend_from_slice(&0u32.to_le_bytes()); // num difat sectors
    header.extend_from_slice(&0u32.to_le_bytes()); // DIFAT[0] = FAT at sector 0
    for _ in 1..109 {
        header.extend_from_slice(&FREESECT.to_le_bytes());
    }
    assert_eq!(header.len(), SECTOR);

    // Assemble file: header + sectors
    let mut file = header;
    for entry in &fat {
        file.extend_from_slice(&entry.to_le_bytes());
    }
    file.extend_from_slice(&dir);
    for (_, data) in streams {
        let mut padded = data.clone();
        padded.resize(padded.len().div_ceil(SECTOR).max(1) * SECTOR, 0);
        file.extend_from_slice(&padded);
    }
    file
}

fn directory_entry(
    name: &str,
    entry_type: u8,
    child: u32,
    right: u32,
    start_sector: u32,
    size: u64,
) -> Vec<u8> {
    let mut entry = vec![0u8; 128];
    let units: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
    assert!(units.len() <= 32, "name too long");
    for (i, unit) in units.iter().enumerate() {
        entry[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
    }
    entry[64..66].copy_from_slice(&((units.len() * 2) as u16).to_le_bytes());
    entry[66] = entry_type;
    entry[67] = 1; // black
    entry[68..72].copy_from_slice(&NOSTREAM.to_le_bytes()); // left
    entry[72..76].copy_from_slice(&right.to_le_bytes());
    entry[76..80].copy_from_slice(&child.to_le_bytes());
    entry[116..120].copy_from_slice(&start_sector.to_le_bytes());
    entry[120..128].copy_from_slice(&size.to_le_bytes());
    entry
}
