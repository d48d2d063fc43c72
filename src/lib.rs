//! Deckling - structured content extraction from PowerPoint presentations
//!
//! This library parses Microsoft PowerPoint presentations in both the legacy
//! binary format (.ppt, OLE2 structured storage) and the modern format
//! (.pptx, Office Open XML) and produces a single normalized
//! [`Presentation`](model::Presentation) record: slides, text, speaker notes,
//! tables, embedded media, themes and document metadata.
//!
//! # Design
//!
//! - **Total parsing**: [`parse`], [`parse_ppt`] and [`parse_pptx`] never
//!   fail. Malformed input degrades to a presentation carrying a single
//!   diagnostic slide; partial damage degrades to partial output.
//! - **Bounded**: record recursion depth, per-level iteration counts, record
//!   lengths and property counts are all capped, so extraction terminates on
//!   adversarial input.
//! - **Self-contained**: the OLE compound-file reader and the `[MS-PPT]`
//!   record walker are implemented in-repo; the .pptx side reads the ZIP
//!   container with the `zip` crate and the XML parts with `quick-xml`.
//!
//! # Example
//!
//! ```no_run
//! use deckling::parse;
//!
//! let bytes = std::fs::read("talk.pptx")?;
//! let size = bytes.len() as u64;
//! let pres = parse(&bytes, "talk.pptx", size, None);
//!
//! println!("{} slides", pres.slides.len());
//! for slide in &pres.slides {
//!     println!("{}: {}", slide.slide_number, slide.title);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

/// Shared helpers: bounds-checked binary reads, GUID generation.
pub mod common;

/// The normalized presentation model produced by both parsers.
pub mod model;

/// OLE2 (Compound File Binary) container and legacy .ppt parsing.
pub mod ole;

/// OOXML (.pptx) container and part parsing.
pub mod ooxml;

mod dispatch;

pub use dispatch::{parse, parse_ppt, parse_pptx};
pub use model::{FileType, Media, Metadata, Presentation, Shape, Slide, Table, Theme};
