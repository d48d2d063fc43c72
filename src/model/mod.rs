//! Normalized presentation model.
//!
//! Both parsers (.ppt and .pptx) emit the same [`Presentation`] record. The
//! JSON serialization of this record is the canonical wire format consumed by
//! downstream exporters; field names are stable snake_case.

use crate::common::{base64_chunked, id::generate_guid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source presentation format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Legacy binary format (OLE2 structured storage)
    Ppt,
    /// Office Open XML format (ZIP container)
    Pptx,
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Ppt => write!(f, "ppt"),
            FileType::Pptx => write!(f, "pptx"),
        }
    }
}

/// Document metadata collected from property streams (.ppt) or the
/// `docProps/*` parts (.pptx).
///
/// All fields are optional strings; counts default to zero and are
/// recomputed (or kept from the source when it supplied them) during
/// [`Presentation::finalize`]. Date fields carry RFC3339 strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub last_modified_by: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub revision: Option<String>,
    pub category: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub application: Option<String>,
    pub app_version: Option<String>,
    pub company: Option<String>,
    pub manager: Option<String>,
    pub template: Option<String>,
    pub presentation_format: Option<String>,
    #[serde(default)]
    pub total_slides: u32,
    #[serde(default)]
    pub total_words: u32,
    #[serde(default)]
    pub total_paragraphs: u32,
}

/// A shape on a slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Placeholder role (`title`, `body`, ...) or `"Shape"` when untyped
    #[serde(rename = "type")]
    pub shape_type: String,
    /// Concatenated text runs of the shape
    pub text: String,
    /// Offset in EMUs, when the shape carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<(i64, i64)>,
    /// Extent in EMUs, when the shape carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<(i64, i64)>,
}

/// A table extracted from a slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: usize,
    pub columns: usize,
    /// Cell text, `cells[row][column]`
    pub cells: Vec<Vec<String>>,
}

/// An embedded media payload (or a reference to one).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    /// Original filename or a synthesized `image_{n}.{ext}` name
    pub name: String,
    /// Category: `image`, `video`, `audio` or `unknown`
    #[serde(rename = "type")]
    pub media_type: String,
    /// Byte length of the decoded content
    pub size: usize,
    /// Lowercased file extension
    pub extension: String,
    /// Base64-encoded content; omitted for zero-length payloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl Media {
    /// Build a media entry from raw bytes. The payload is base64-encoded and
    /// `size` always equals the decoded length.
    pub fn from_bytes(name: impl Into<String>, extension: &str, data: &[u8]) -> Self {
        let extension = extension.to_ascii_lowercase();
        Self {
            name: name.into(),
            media_type: media_category(&extension).to_string(),
            size: data.len(),
            data: if data.is_empty() {
                None
            } else {
                Some(base64_chunked(data))
            },
            extension,
        }
    }

    /// Build a size-zero reference entry (e.g. a picture relationship in a
    /// slide whose bytes live elsewhere in the package).
    pub fn reference(name: impl Into<String>, media_type: &str) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.to_string(),
            size: 0,
            extension: String::new(),
            data: None,
        }
    }
}

/// Classify a file extension into a media category.
pub fn media_category(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tiff" | "webp" | "emf" | "wmf" | "pict" => {
            "image"
        },
        "mp4" | "avi" | "mov" | "wmv" | "webm" => "video",
        "mp3" | "wav" | "ogg" | "wma" | "m4a" => "audio",
        _ => "unknown",
    }
}

/// A theme definition (.pptx only).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    /// Entries in the form `"{role}: #RRGGBB"`
    pub colors: Vec<String>,
    /// Entries in the form `"Major: {typeface}"` / `"Minor: {typeface}"`
    pub fonts: Vec<String>,
}

/// A single slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based position; always `index + 1` after assembly
    pub slide_number: u32,
    /// Title text; `"Slide {n}"` when the source had none
    pub title: String,
    /// Ordered body paragraphs (title excluded)
    pub text_content: Vec<String>,
    /// Speaker notes joined by newline
    pub notes: String,
    pub shapes: Vec<Shape>,
    pub images: Vec<Media>,
    pub tables: Vec<Table>,
}

impl Slide {
    /// Create an empty slide with the given 1-based number.
    pub fn new(slide_number: u32) -> Self {
        Self {
            slide_number,
            ..Default::default()
        }
    }
}

/// The root record produced by one parser invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    /// Opaque identifier, unique per extraction
    pub id: String,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: FileType,
    /// Timestamp when extraction finished
    pub extracted_at: DateTime<Utc>,
    pub metadata: Metadata,
    pub slides: Vec<Slide>,
    pub media: Vec<Media>,
    pub themes: Vec<Theme>,
    pub master_slides: Vec<String>,
    pub custom_properties: BTreeMap<String, String>,
}

impl Presentation {
    /// Create an empty presentation shell for the given source file.
    pub fn new(file_name: impl Into<String>, file_size: u64, file_type: FileType) -> Self {
        Self {
            id: generate_guid(),
            file_name: file_name.into(),
            file_size,
            file_type,
            extracted_at: Utc::now(),
            metadata: Metadata::default(),
            slides: Vec::new(),
            media: Vec::new(),
            themes: Vec::new(),
            master_slides: Vec::new(),
            custom_properties: BTreeMap::new(),
        }
    }

    /// Build the single-slide presentation reported when extraction fails
    /// outright. The error message is carried in `custom_properties.error`.
    pub fn diagnostic_error(
        file_name: impl Into<String>,
        file_size: u64,
        file_type: FileType,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let mut pres = Self::new(file_name, file_size, file_type);
        let mut slide = Slide::new(1);
        slide.title = "Error".to_string();
        slide.text_content.push(message.clone());
        pres.slides.push(slide);
        pres.custom_properties.insert("error".to_string(), message);
        pres.finalize();
        pres
    }

    /// The slide emitted when parsing succeeded but no usable text survived
    /// validation.
    pub fn no_content_slide() -> Slide {
        let mut slide = Slide::new(1);
        slide.title = "No Content Found".to_string();
        slide
            .text_content
            .push("Could not extract text from this presentation.".to_string());
        slide
    }

    /// Normalize the assembled presentation:
    ///
    /// - slides are renumbered so `slides[i].slide_number == i + 1`
    /// - empty titles default to `"Slide {n}"`
    /// - a presentation with no slides gains the no-content slide
    /// - `metadata.total_slides` is set to the slide count
    /// - word/paragraph counts are computed when the source supplied none
    pub fn finalize(&mut self) {
        if self.slides.is_empty() {
            self.slides.push(Self::no_content_slide());
        }
        for (i, slide) in self.slides.iter_mut().enumerate() {
            slide.slide_number = (i + 1) as u32;
            if slide.title.trim().is_empty() {
                slide.title = format!("Slide {}", i + 1);
            }
        }
        self.metadata.total_slides = self.slides.len() as u32;
        if self.metadata.total_words == 0 {
            self.metadata.total_words = self
                .slides
                .iter()
                .map(|s| {
                    word_count(&s.title)
                        + s.text_content.iter().map(|t| word_count(t)).sum::<u32>()
                })
                .sum();
        }
        if self.metadata.total_paragraphs == 0 {
            self.metadata.total_paragraphs =
                self.slides.iter().map(|s| s.text_content.len() as u32).sum();
        }
    }
}

/// Count whitespace-separated non-empty tokens.
pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_from_bytes_size_invariant() {
        use base64::Engine;
        let media = Media::from_bytes("image_1.png", "PNG", b"\x89PNG\r\n");
        assert_eq!(media.extension, "png");
        assert_eq!(media.media_type, "image");
        assert_eq!(media.size, 6);
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(media.data.as_deref().unwrap())
            .unwrap();
        assert_eq!(decoded.len(), media.size);
    }

    #[test]
    fn test_media_empty_payload_omits_data() {
        let media = Media::from_bytes("empty.bin", "bin", b"");
        assert_eq!(media.size, 0);
        assert!(media.data.is_none());
    }

    #[test]
    fn test_media_category() {
        assert_eq!(media_category("JPG"), "image");
        assert_eq!(media_category("mp4"), "video");
        assert_eq!(media_category("ogg"), "audio");
        assert_eq!(media_category("docx"), "unknown");
    }

    #[test]
    fn test_finalize_renumbers_and_titles() {
        let mut pres = Presentation::new("deck.ppt", 100, FileType::Ppt);
        let mut first = Slide::new(7);
        first.title = "Intro".to_string();
        first.text_content.push("one two three".to_string());
        pres.slides.push(first);
        pres.slides.push(Slide::new(9));
        pres.finalize();

        assert_eq!(pres.slides[0].slide_number, 1);
        assert_eq!(pres.slides[1].slide_number, 2);
        assert_eq!(pres.slides[1].title, "Slide 2");
        assert_eq!(pres.metadata.total_slides, 2);
        // "Intro" + "one two three" + "Slide 2"
        assert_eq!(pres.metadata.total_words, 6);
        assert_eq!(pres.metadata.total_paragraphs, 1);
    }

    #[test]
    fn test_finalize_keeps_source_counts() {
        let mut pres = Presentation::new("deck.pptx", 100, FileType::Pptx);
        pres.metadata.total_words = 1234;
        pres.slides.push(Slide::new(1));
        pres.finalize();
        assert_eq!(pres.metadata.total_words, 1234);
        assert_eq!(pres.metadata.total_slides, 1);
    }

    #[test]
    fn test_finalize_empty_gets_no_content_slide() {
        let mut pres = Presentation::new("deck.ppt", 0, FileType::Ppt);
        pres.finalize();
        assert_eq!(pres.slides.len(), 1);
        assert_eq!(pres.slides[0].title, "No Content Found");
    }

    #[test]
    fn test_diagnostic_error_shape() {
        let pres =
            Presentation::diagnostic_error("bad.ppt", 3, FileType::Ppt, "not a compound file");
        assert_eq!(pres.slides.len(), 1);
        assert_eq!(pres.slides[0].title, "Error");
        assert_eq!(
            pres.custom_properties.get("error").map(String::as_str),
            Some("not a compound file")
        );
    }

    #[test]
    fn test_file_type_serialization() {
        assert_eq!(serde_json::to_string(&FileType::Ppt).unwrap(), "\"ppt\"");
        assert_eq!(serde_json::to_string(&FileType::Pptx).unwrap(), "\"pptx\"");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  Hello   World "), 2);
    }
}
