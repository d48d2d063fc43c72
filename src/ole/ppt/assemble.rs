//! Slide assembly from walked text.
//!
//! Two explicit paths: when the walker saw `Slide` containers, their text
//! buckets map directly to slides; when the stream yielded only a flat text
//! list (no usable record structure, or the degraded scan), slides are
//! reconstructed heuristically.

use super::walker::ParseResult;
use crate::model::Slide;

/// Texts shorter than this may become a slide title on the heuristic path.
const TITLE_MAX_CHARS: usize = 100;

/// Tunables for the heuristic path.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Body paragraphs accumulated before a heuristic slide is flushed
    pub max_body_per_slide: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            max_body_per_slide: 6,
        }
    }
}

/// Partitions validated text into slides.
#[derive(Debug, Default)]
pub struct SlideAssembler {
    config: AssemblerConfig,
}

impl SlideAssembler {
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Assemble slides from a walk result, preferring record boundaries when
    /// any were seen.
    pub fn assemble(&self, result: &ParseResult) -> Vec<Slide> {
        if !result.slide_texts.is_empty() {
            self.from_buckets(result)
        } else {
            self.from_flat(&result.texts)
        }
    }

    /// Structured path: one slide per `Slide` container, in container order.
    /// The first string of each bucket becomes the title.
    fn from_buckets(&self, result: &ParseResult) -> Vec<Slide> {
        result
            .slide_texts
            .values()
            .map(|texts| {
                let mut slide = Slide::new(0);
                let mut iter = texts.iter();
                if let Some(title) = iter.next() {
                    slide.title = title.clone();
                }
                slide.text_content = iter.cloned().collect();
                slide
            })
            .collect()
    }

    /// Heuristic path: deduplicate, then split greedily. The first short
    /// text of a group becomes the title; a slide is flushed once its body
    /// reaches the configured size.
    fn from_flat(&self, texts: &[String]) -> Vec<Slide> {
        let deduped = dedupe_case_insensitive(texts);
        let mut slides = Vec::new();
        let mut current = Slide::new(0);
        let mut has_title = false;

        for text in deduped {
            if !has_title && text.chars().count() < TITLE_MAX_CHARS {
                current.title = text;
                has_title = true;
            } else {
                current.text_content.push(text);
                if current.text_content.len() >= self.config.max_body_per_slide {
                    slides.push(std::mem::replace(&mut current, Slide::new(0)));
                    has_title = false;
                }
            }
        }

        if has_title || !current.text_content.is_empty() {
            slides.push(current);
        }
        slides
    }
}

/// Order-preserving case-insensitive deduplication.
fn dedupe_case_insensitive(texts: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    texts
        .iter()
        .filter(|t| seen.insert(t.to_lowercase()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(texts: &[&str]) -> ParseResult {
        ParseResult {
            texts: texts.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_buckets_win_over_flat_list() {
        let mut result = flat(&["stray"]);
        result
            .slide_texts
            .insert(2, vec!["Title two".to_string(), "Body two".to_string()]);
        result.slide_texts.insert(1, vec!["Title one".to_string()]);

        let slides = SlideAssembler::default().assemble(&result);
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title, "Title one");
        assert_eq!(slides[1].title, "Title two");
        assert_eq!(slides[1].text_content, vec!["Body two"]);
    }

    #[test]
    fn test_flat_short_text_becomes_title() {
        let result = flat(&["Agenda", "Q3 Results"]);
        let slides = SlideAssembler::default().assemble(&result);
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Agenda");
        assert_eq!(slides[0].text_content, vec!["Q3 Results"]);
    }

    #[test]
    fn test_flat_long_first_text_is_body() {
        let long = "x".repeat(120);
        let result = flat(&[&long, "Short title"]);
        let slides = SlideAssembler::default().assemble(&result);
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Short title");
        assert_eq!(slides[0].text_content, vec![long]);
    }

    #[test]
    fn test_flat_flushes_at_configured_size() {
        let texts: Vec<String> = (0..16).map(|i| format!("paragraph number {}", i)).collect();
        let result = ParseResult {
            texts,
            ..Default::default()
        };
        let assembler = SlideAssembler::new(AssemblerConfig {
            max_body_per_slide: 3,
        });
        let slides = assembler.assemble(&result);
        // 16 texts: the first becomes a title, then bodies of 3 flush slides.
        assert!(slides.len() >= 4);
        for slide in &slides[..slides.len() - 1] {
            assert!(slide.text_content.len() <= 3);
        }
    }

    #[test]
    fn test_dedupe_is_case_insensitive_and_ordered() {
        let result = flat(&["Chorus", "CHORUS", "Verse", "chorus"]);
        let slides = SlideAssembler::default().assemble(&result);
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Chorus");
        assert_eq!(slides[0].text_content, vec!["Verse"]);
    }

    #[test]
    fn test_empty_input_yields_no_slides() {
        let slides = SlideAssembler::default().assemble(&ParseResult::default());
        assert!(slides.is_empty());
    }
}
