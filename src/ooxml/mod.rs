/// OOXML (Office Open XML) parsing for modern .pptx presentations.
///
/// A .pptx file is a ZIP package of XML parts. Only the parts the extractor
/// consumes are read: document properties under `docProps/`, slides, notes,
/// themes, slide masters and binary media under `ppt/`.
pub mod container;
pub mod custom;
pub mod error;
pub mod metadata;
pub mod pptx;

pub use error::{OoxmlError, Result};
