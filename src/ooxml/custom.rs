//! Custom document properties (`docProps/custom.xml`).
//!
//! Custom properties attach arbitrary named values to a document. Every
//! value type is surfaced as its string representation; the extractor does
//! not need typed access.

use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::BTreeMap;

/// Parse `docProps/custom.xml` into a name → value map.
pub fn parse_custom_properties(xml: &[u8]) -> Result<BTreeMap<String, String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut properties = BTreeMap::new();
    let mut current_name: Option<String> = None;
    let mut current_value = String::new();
    let mut depth_in_property = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"property" {
                    current_name = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.local_name().as_ref() == b"name")
                        .and_then(|a| String::from_utf8(a.value.into_owned()).ok());
                    current_value.clear();
                    depth_in_property = 1;
                } else if depth_in_property > 0 {
                    depth_in_property += 1;
                }
            },
            Ok(Event::Text(e)) if depth_in_property > 0 => {
                if let Ok(t) = e.unescape() {
                    current_value.push_str(&t);
                }
            },
            Ok(Event::End(ref e)) => {
                if depth_in_property > 0 {
                    depth_in_property -= 1;
                }
                if e.local_name().as_ref() == b"property"
                    && let Some(name) = current_name.take()
                {
                    let value = current_value.trim().to_string();
                    if !name.is_empty() {
                        properties.insert(name, value);
                    }
                    current_value.clear();
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(properties)
}
