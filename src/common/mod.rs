/// Bounds-checked little-endian reads over byte slices.
pub mod binary;

/// Random identifier generation.
pub mod id;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Block size for chunked base64 encoding. A multiple of 3 so no padding is
/// emitted mid-stream.
const BASE64_BLOCK: usize = 3 * 2730;

/// Base64-encode a payload block by block.
///
/// Large media payloads are encoded in fixed-size chunks so that no
/// intermediate buffer ever holds more than one block of input.
pub fn base64_chunked(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for block in data.chunks(BASE64_BLOCK) {
        STANDARD.encode_string(block, &mut out);
    }
    out
}
