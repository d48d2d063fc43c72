//! Degraded whole-file text scan.
//!
//! When the compound-file header is invalid or the `PowerPoint Document`
//! stream is missing, there is no record structure to walk. This scan slides
//! over the raw bytes looking for plausible UTF-16LE character runs and lets
//! the validator decide which survivors are content.

use super::text::sanitize;
use super::validate::is_valid_text;

/// Minimum run length (in characters) worth keeping.
const MIN_RUN_CHARS: usize = 4;

/// Upper bound on collected strings; noise can otherwise produce millions.
const MAX_STRINGS: usize = 10_000;

/// Whether a UTF-16 code unit plausibly belongs to presentation text.
fn is_plausible_unit(unit: u16) -> bool {
    matches!(unit,
        0x0020..=0x007E       // printable ASCII
        | 0x00A0..=0x024F     // Latin-1 Supplement + Latin Extended
        | 0x0370..=0x03FF     // Greek
        | 0x0400..=0x04FF     // Cyrillic
    )
}

/// Scan raw bytes for UTF-16LE strings.
pub fn scan_unicode_strings(data: &[u8]) -> Vec<String> {
    let mut strings = Vec::new();
    let mut run = String::new();
    let mut i = 0usize;

    while i + 1 < data.len() {
        if strings.len() >= MAX_STRINGS {
            log::debug!("degraded scan reached the string cap");
            break;
        }

        let unit = u16::from_le_bytes([data[i], data[i + 1]]);
        if is_plausible_unit(unit) {
            // Safe: the plausible ranges are all valid scalar values.
            if let Some(ch) = char::from_u32(unit as u32) {
                run.push(ch);
            }
            i += 2;
        } else if run.is_empty() {
            // Not inside a run: advance one byte so strings at odd offsets
            // are still found.
            i += 1;
        } else {
            flush_run(&mut run, &mut strings);
            i += 2;
        }
    }
    flush_run(&mut run, &mut strings);

    strings
}

fn flush_run(run: &mut String, strings: &mut Vec<String>) {
    if run.chars().count() >= MIN_RUN_CHARS {
        let clean = sanitize(run);
        if is_valid_text(&clean) {
            strings.push(clean);
        }
    }
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    #[test]
    fn test_finds_embedded_strings() {
        let mut data = vec![0xFFu8; 64];
        data.extend(utf16("Hidden slide title"));
        data.extend(vec![0x03u8; 64]);
        let strings = scan_unicode_strings(&data);
        assert_eq!(strings, vec!["Hidden slide title"]);
    }

    #[test]
    fn test_finds_odd_offset_strings() {
        let mut data = vec![0xFFu8];
        data.extend(utf16("Misaligned but real"));
        let strings = scan_unicode_strings(&data);
        assert_eq!(strings, vec!["Misaligned but real"]);
    }

    #[test]
    fn test_short_runs_are_dropped() {
        let mut data = Vec::new();
        data.extend(utf16("ab"));
        data.extend(vec![0u8; 8]);
        data.extend(utf16("cd"));
        assert!(scan_unicode_strings(&data).is_empty());
    }

    #[test]
    fn test_noise_survives_validation_rarely() {
        let noise: Vec<u8> = (0..2048u32).map(|i| (i.wrapping_mul(197) >> 3) as u8).collect();
        // Must terminate and not panic; whatever it returns passed validation.
        for s in scan_unicode_strings(&noise) {
            assert!(is_valid_text(&s));
        }
    }
}
