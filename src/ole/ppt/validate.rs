//! Content validation predicates.
//!
//! Record streams yield plenty of strings that decode cleanly but are not
//! slide content: stream names, package artifacts, font names, template
//! placeholders, and binary noise that happens to survive UTF-16 decoding.
//! These predicates separate presentation text from that residue.
//!
//! Classification works on explicit Unicode code-point ranges rather than
//! regular expressions, so behavior does not depend on a regex engine's
//! notion of character classes.

/// Share of characters that must look textual for a string to be accepted.
const MIN_TEXTUAL_RATIO: f32 = 0.5;

/// Share of exotic high-Unicode characters above which a string is assumed
/// to be binary noise misread as UTF-16LE.
const MAX_EXOTIC_RATIO: f32 = 0.2;

/// Characters counted as textual: Latin (ASCII plus Latin-1 Supplement and
/// Latin Extended A/B), Greek, Cyrillic, digits, common punctuation, space.
fn is_textual_char(c: char) -> bool {
    if c.is_ascii_alphanumeric() || c.is_ascii_punctuation() || c == ' ' || c == '\t' {
        return true;
    }
    matches!(c as u32,
        0x00A0..=0x00FF   // Latin-1 Supplement
        | 0x0100..=0x024F // Latin Extended A/B
        | 0x0370..=0x03FF // Greek
        | 0x0400..=0x04FF // Cyrillic
    )
}

/// Scripts that essentially never appear in the corpus this extractor
/// targets but show up constantly when binary data is misread as UTF-16LE.
fn is_exotic_char(c: char) -> bool {
    matches!(c as u32,
        0x0590..=0x05FF   // Hebrew
        | 0x0600..=0x06FF // Arabic
        | 0x0E00..=0x0E7F // Thai
        | 0x0F00..=0x0FFF // Tibetan
        | 0x1100..=0x11FF // Hangul Jamo
        | 0x3400..=0x4DBF // CJK Extension A
        | 0x4E00..=0x9FFF // CJK Unified Ideographs
        | 0xAC00..=0xD7AF // Hangul Syllables
        | 0xE000..=0xF8FF // Private Use Area
    )
}

/// Structural stream and package names that leak out of containers.
const CONTAINER_NAMES: &[&str] = &[
    "Root Entry",
    "PowerPoint Document",
    "Current User",
    "SummaryInformation",
    "DocumentSummaryInformation",
    "Pictures",
];

/// Template placeholders and UI strings PowerPoint stores in master slides.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "click to edit",
    "edit master",
    "master title",
    "master text",
    "master subtitle",
    "second level",
    "third level",
    "fourth level",
    "fifth level",
];

/// Font names that appear as standalone CString atoms.
const FONT_NAMES: &[&str] = &["arial", "times new roman", "calibri", "tahoma", "verdana"];

/// Known-garbage shapes: hex dumps, stream names, package artifacts, pure
/// digits, single letters.
fn is_garbage(text: &str) -> bool {
    // pure digits (slide-number placeholders, ids)
    if text.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    // single characters are never content
    if text.chars().count() <= 1 {
        return true;
    }
    // long pure-hex strings are ids or dumped bytes
    if text.len() >= 8 && text.chars().all(|c| c.is_ascii_hexdigit()) {
        return true;
    }
    if CONTAINER_NAMES
        .iter()
        .any(|name| text.eq_ignore_ascii_case(name))
    {
        return true;
    }
    // ZIP / OPC artifacts
    if text.starts_with("PK") && text.len() <= 4 {
        return true;
    }
    if text.contains("[Content_Types]")
        || text.contains("_rels/")
        || text.ends_with(".xml")
        || text.ends_with(".rels")
    {
        return true;
    }
    false
}

/// Whether a decoded string is a system or template string rather than
/// authored content.
pub fn is_system_string(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return false;
    }
    if PLACEHOLDER_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }
    if FONT_NAMES.iter().any(|f| lower == *f) {
        return true;
    }
    CONTAINER_NAMES
        .iter()
        .any(|name| lower.eq_ignore_ascii_case(&name.to_lowercase()))
}

/// Acceptance predicate for decoded strings.
///
/// A string is accepted only when it is at least two characters long,
/// contains a letter, carries no remaining C0 controls, is mostly textual,
/// is not dominated by exotic high-Unicode characters, and matches neither
/// the garbage shapes nor the system-string list.
pub fn is_valid_text(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < 2 {
        return false;
    }
    if trimmed
        .chars()
        .any(|c| (c as u32) < 0x20 && c != '\t' && c != '\n')
    {
        return false;
    }
    if !trimmed.chars().any(|c| c.is_alphabetic()) {
        return false;
    }

    let total = trimmed.chars().count() as f32;
    let textual = trimmed.chars().filter(|&c| is_textual_char(c)).count() as f32;
    if textual / total < MIN_TEXTUAL_RATIO {
        return false;
    }
    let exotic = trimmed.chars().filter(|&c| is_exotic_char(c)).count() as f32;
    if exotic / total >= MAX_EXOTIC_RATIO {
        return false;
    }

    !is_garbage(trimmed) && !is_system_string(trimmed)
}
