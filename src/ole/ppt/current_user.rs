//! `Current User` stream sanity check.
//!
//! The stream records the current editing session. Its header token doubles
//! as a format probe: encrypted presentations and pre-97 files carry a
//! different token, which is worth a warning before text extraction comes up
//! empty.

use zerocopy::FromBytes;
use zerocopy_derive::FromBytes as DeriveFromBytes;

/// Expected header token for an unencrypted presentation.
const HEADER_TOKEN: u32 = 0xE391C05F;

/// Header token used by encrypted presentations.
const ENCRYPTED_HEADER_TOKEN: u32 = 0xF3D1C4DF;

/// Minimum stream size covering the fixed header fields.
const CURRENT_USER_MIN_SIZE: usize = 24;

/// Fixed-layout prefix of the CurrentUserAtom (after the 4-byte size field).
#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
#[allow(dead_code)]
struct RawCurrentUser {
    /// Header token
    header_token: zerocopy::U32<zerocopy::LE>,
    /// Offset of the current UserEditAtom in the document stream
    current_edit_offset: zerocopy::U32<zerocopy::LE>,
    /// ANSI username length in characters
    ansi_username_len: zerocopy::U16<zerocopy::LE>,
    /// File format version
    doc_file_version: zerocopy::U16<zerocopy::LE>,
    /// Major version (3 for PowerPoint 97 and later)
    major_version: u8,
    /// Minor version
    minor_version: u8,
    _unused: zerocopy::U16<zerocopy::LE>,
}

/// Parsed `Current User` stream.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub current_edit_offset: u32,
    pub username: String,
    pub encrypted: bool,
}

impl CurrentUser {
    /// Parse the stream. Returns `None` when the stream is too short or the
    /// header token matches neither known value.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < CURRENT_USER_MIN_SIZE {
            return None;
        }

        let raw = RawCurrentUser::read_from_bytes(&data[4..20]).ok()?;
        let token = raw.header_token.get();
        let encrypted = match token {
            HEADER_TOKEN => false,
            ENCRYPTED_HEADER_TOKEN => true,
            _ => return None,
        };

        // ANSI username follows the fixed fields at offset 24.
        let name_len = raw.ansi_username_len.get() as usize;
        let username = if name_len > 0 && 24 + name_len <= data.len() {
            String::from_utf8_lossy(&data[24..24 + name_len])
                .trim_end_matches('\0')
                .to_string()
        } else {
            String::new()
        };

        Some(Self {
            current_edit_offset: raw.current_edit_offset.get(),
            username,
            encrypted,
        })
    }
}
