//! Speaker-notes decoding (`ppt/notesSlides/notesSlide{n}.xml`).

use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Extract speaker notes from a notes part.
///
/// Notes slides embed the slide-number placeholder as its own paragraph;
/// purely numeric paragraphs are dropped for that reason. Remaining
/// paragraphs are joined by newline.
pub fn parse_notes_xml(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text_run = true,
                _ => {},
            },
            Ok(Event::Text(e)) => {
                if in_text_run
                    && let Ok(text) = e.unescape()
                {
                    current.push_str(&text);
                }
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    let paragraph = current.trim().to_string();
                    if !paragraph.is_empty() && !is_slide_number(&paragraph) {
                        paragraphs.push(paragraph);
                    }
                    current.clear();
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Slide-number placeholders render as digit-only paragraphs.
fn is_slide_number(paragraph: &str) -> bool {
    paragraph.chars().all(|c| c.is_ascii_digit())
}
