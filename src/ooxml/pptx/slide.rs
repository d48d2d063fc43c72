//! Slide XML decoding.
//!
//! DrawingML slides nest text runs (`<a:t>`) inside paragraphs (`<a:p>`)
//! inside shapes (`<p:sp>`); tables and pictures arrive as graphic frames.
//! Elements are matched by local name, so the namespace prefixes used by
//! different producers do not matter.

use crate::model::{Media, Shape, Table};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Placeholder types whose first occurrence provides the slide title.
const TITLE_PLACEHOLDERS: &[&str] = &["title", "ctrTitle"];

/// Everything extracted from one slide part.
#[derive(Debug, Default)]
pub struct SlideContent {
    /// Text of the first title-placeholder shape, when one exists
    pub title: Option<String>,
    /// Body paragraphs in document order (title shape excluded)
    pub paragraphs: Vec<String>,
    pub shapes: Vec<Shape>,
    pub tables: Vec<Table>,
    /// Picture references; bytes are resolved later from `ppt/media/`
    pub images: Vec<Media>,
}

/// Streaming state for one slide parse.
#[derive(Default)]
struct SlideParser {
    content: SlideContent,

    in_shape: bool,
    ph_type: Option<String>,
    shape_paragraphs: Vec<String>,
    current_paragraph: String,
    position: Option<(i64, i64)>,
    size: Option<(i64, i64)>,

    in_text_run: bool,
    in_picture: bool,

    in_table: bool,
    table_rows: Vec<Vec<String>>,
    current_row: Vec<String>,
    current_cell: String,
    in_cell: bool,
}

/// Decode one `ppt/slides/slide{n}.xml` part.
pub fn parse_slide_xml(xml: &[u8]) -> Result<SlideContent> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut state = SlideParser::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => state.handle_start(e),
            Ok(Event::Empty(ref e)) => state.handle_empty(e),
            Ok(Event::Text(e)) => {
                if state.in_text_run
                    && let Ok(text) = e.unescape()
                {
                    state.push_run(&text);
                }
            },
            Ok(Event::End(ref e)) => state.handle_end(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(state.content)
}

impl SlideParser {
    fn handle_start(&mut self, e: &BytesStart) {
        match e.local_name().as_ref() {
            b"sp" => {
                self.in_shape = true;
                self.ph_type = None;
                self.shape_paragraphs.clear();
                self.current_paragraph.clear();
                self.position = None;
                self.size = None;
            },
            b"ph" => self.read_placeholder(e),
            b"p" => self.current_paragraph.clear(),
            b"t" => self.in_text_run = true,
            b"tbl" => {
                self.in_table = true;
                self.table_rows.clear();
            },
            b"tr" => self.current_row.clear(),
            b"tc" => {
                self.in_cell = true;
                self.current_cell.clear();
            },
            b"pic" => self.in_picture = true,
            b"blip" => self.read_blip(e),
            b"off" => self.read_offset(e),
            b"ext" => self.read_extent(e),
            _ => {},
        }
    }

    /// Self-closing variants of attribute-only elements.
    fn handle_empty(&mut self, e: &BytesStart) {
        match e.local_name().as_ref() {
            b"ph" => self.read_placeholder(e),
            b"blip" => self.read_blip(e),
            b"off" => self.read_offset(e),
            b"ext" => self.read_extent(e),
            _ => {},
        }
    }

    fn handle_end(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text_run = false,
            b"p" => self.end_paragraph(),
            b"tc" => {
                self.in_cell = false;
                self.current_row
                    .push(self.current_cell.trim().to_string());
            },
            b"tr" => {
                self.table_rows.push(std::mem::take(&mut self.current_row));
            },
            b"tbl" => {
                self.in_table = false;
                let rows = std::mem::take(&mut self.table_rows);
                self.content.tables.push(Table {
                    rows: rows.len(),
                    columns: rows.first().map(Vec::len).unwrap_or(0),
                    cells: rows,
                });
            },
            b"pic" => self.in_picture = false,
            b"sp" => self.end_shape(),
            _ => {},
        }
    }

    fn push_run(&mut self, text: &str) {
        if self.in_cell {
            self.current_cell.push_str(text);
        } else if self.in_shape {
            self.current_paragraph.push_str(text);
        }
    }

    fn end_paragraph(&mut self) {
        if self.in_cell {
            // Paragraph breaks inside a cell become single spaces.
            if !self.current_cell.is_empty() && !self.current_cell.ends_with(' ') {
                self.current_cell.push(' ');
            }
            return;
        }
        if self.in_shape && !self.in_table {
            let paragraph = self.current_paragraph.trim().to_string();
            if !paragraph.is_empty() {
                self.shape_paragraphs.push(paragraph);
            }
        }
        self.current_paragraph.clear();
    }

    fn end_shape(&mut self) {
        self.in_shape = false;
        let paragraphs = std::mem::take(&mut self.shape_paragraphs);
        let text = paragraphs.join(" ");
        let shape_type = self.ph_type.take().unwrap_or_else(|| "Shape".to_string());

        let is_title =
            TITLE_PLACEHOLDERS.contains(&shape_type.as_str()) && self.content.title.is_none();
        if is_title {
            self.content.title = Some(text.clone());
        } else {
            self.content.paragraphs.extend(paragraphs);
        }

        self.content.shapes.push(Shape {
            shape_type,
            text,
            position: self.position.take(),
            size: self.size.take(),
        });
    }

    fn read_placeholder(&mut self, e: &BytesStart) {
        if !self.in_shape {
            return;
        }
        let ph_type = attr_value(e, b"type").unwrap_or_else(|| "body".to_string());
        self.ph_type = Some(ph_type);
    }

    fn read_blip(&mut self, e: &BytesStart) {
        if !self.in_picture {
            return;
        }
        if let Some(rel_id) = attr_value(e, b"embed") {
            self.content
                .images
                .push(Media::reference(format!("Image reference: {}", rel_id), "image"));
        }
    }

    fn read_offset(&mut self, e: &BytesStart) {
        if self.in_shape
            && let (Some(x), Some(y)) = (attr_i64(e, b"x"), attr_i64(e, b"y"))
        {
            self.position = Some((x, y));
        }
    }

    fn read_extent(&mut self, e: &BytesStart) {
        if self.in_shape
            && let (Some(cx), Some(cy)) = (attr_i64(e, b"cx"), attr_i64(e, b"cy"))
        {
            self.size = Some((cx, cy));
        }
    }
}

/// Read an attribute by local name.
fn attr_value(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| String::from_utf8(a.value.into_owned()).ok())
}

fn attr_i64(e: &BytesStart, name: &[u8]) -> Option<i64> {
    attr_value(e, name).and_then(|v| v.parse().ok())
}

/// Read the `name` attribute of the `<p:cSld>` element, used for slide
/// master display names.
pub fn parse_csld_name(xml: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"cSld" {
                    let name = attr_value(e, b"name")?;
                    return if name.is_empty() { None } else { Some(name) };
                }
            },
            Ok(Event::Eof) | Err(_) => return None,
            _ => {},
        }
    }
}
