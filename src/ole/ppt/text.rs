//! Character decoding and text normalization for atom payloads.

use encoding_rs::WINDOWS_1252;

/// Decode UTF-16LE bytes to a String, stopping at the first null code unit.
///
/// Invalid code units (unpaired surrogates) are skipped rather than replaced;
/// atom payloads frequently carry binary noise and a replacement character
/// would survive into the output otherwise.
pub fn decode_utf16le(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(bytes.len() / 2);
    for chunk in bytes.chunks_exact(2) {
        let code_unit = u16::from_le_bytes([chunk[0], chunk[1]]);
        if code_unit == 0 {
            break;
        }
        if let Some(ch) = char::from_u32(code_unit as u32) {
            result.push(ch);
        }
    }
    result
}

/// Decode Windows-1252 bytes to a String, stopping at the first null byte.
///
/// Bytes 0x80-0x9F map through the Windows-1252 extension table (curly
/// quotes, dashes, the euro sign); 0x00-0x7F and 0xA0-0xFF map as in
/// Latin-1.
pub fn decode_win1252(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    if end == 0 {
        return String::new();
    }
    WINDOWS_1252.decode(&bytes[..end]).0.into_owned()
}

/// Normalize decoded text:
///
/// 1. `\r\n` and lone `\r` become `\n`
/// 2. C0 controls other than `\t` and `\n` are stripped
/// 3. whitespace runs collapse to a single space
/// 4. the result is trimmed
///
/// Idempotent: `sanitize(sanitize(s)) == sanitize(s)`.
pub fn sanitize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                normalized.push('\n');
            },
            c if (c as u32) < 0x20 && c != '\t' && c != '\n' => {},
            c => normalized.push(c),
        }
    }

    let mut result = String::with_capacity(normalized.len());
    let mut in_whitespace = false;
    for c in normalized.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                result.push(' ');
                in_whitespace = true;
            }
        } else {
            result.push(c);
            in_whitespace = false;
        }
    }

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf16le_stops_at_null() {
        let data = b"H\x00i\x00\x00\x00!\x00";
        assert_eq!(decode_utf16le(data), "Hi");
    }

    #[test]
    fn test_decode_utf16le_basic() {
        let data = [0x41, 0x00, 0x67, 0x00, 0x65, 0x00]; // "Age"
        assert_eq!(decode_utf16le(&data), "Age");
    }

    #[test]
    fn test_decode_utf16le_skips_unpaired_surrogates() {
        let data = [0x41, 0x00, 0x00, 0xD8, 0x42, 0x00]; // 'A', lone high surrogate, 'B'
        assert_eq!(decode_utf16le(&data), "AB");
    }

    #[test]
    fn test_decode_win1252_extension_table() {
        assert_eq!(decode_win1252(b"\x80"), "\u{20AC}"); // euro
        assert_eq!(decode_win1252(b"\x92"), "\u{2019}"); // right single quote
        assert_eq!(decode_win1252(b"\x93ok\x94"), "\u{201C}ok\u{201D}");
    }

    #[test]
    fn test_decode_win1252_null_terminates() {
        assert_eq!(decode_win1252(b"A\x00B"), "A");
    }

    #[test]
    fn test_decode_win1252_latin1_range() {
        assert_eq!(decode_win1252(b"caf\xE9"), "caf\u{E9}");
    }

    #[test]
    fn test_sanitize_newlines_and_controls() {
        assert_eq!(sanitize("a\r\nb\rc"), "a b c");
        assert_eq!(sanitize("a\x01\x02b"), "ab");
        assert_eq!(sanitize("  keep\tme  "), "keep me");
    }

    #[test]
    fn test_sanitize_idempotent() {
        for input in ["  a\r\n\tb \x07c  ", "plain", "", "\r\r\n", "x  \u{0} y"] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once);
        }
    }
}
