//! Core and application properties extraction.
//!
//! `docProps/core.xml` carries Dublin-Core metadata (title, creator, dates);
//! `docProps/app.xml` carries application metadata and statistics. Elements
//! are matched by local name so namespace prefixes do not matter.

use crate::model::Metadata;
use crate::ooxml::error::{OoxmlError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Parse `docProps/core.xml` into the shared metadata record.
///
/// Fields already populated by the caller are overwritten; core properties
/// are authoritative for the fields they carry.
pub fn parse_core_properties(xml: &[u8], metadata: &mut Metadata) -> Result<()> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"title" => {
                    if let Some(text) = read_text_element(&mut reader)? {
                        metadata.title = Some(text);
                    }
                },
                b"subject" => {
                    if let Some(text) = read_text_element(&mut reader)? {
                        metadata.subject = Some(text);
                    }
                },
                b"creator" => {
                    if let Some(text) = read_text_element(&mut reader)? {
                        metadata.creator = Some(text);
                    }
                },
                b"keywords" => {
                    if let Some(text) = read_text_element(&mut reader)? {
                        metadata.keywords = Some(text);
                    }
                },
                b"description" => {
                    if let Some(text) = read_text_element(&mut reader)? {
                        metadata.description = Some(text);
                    }
                },
                b"lastModifiedBy" => {
                    if let Some(text) = read_text_element(&mut reader)? {
                        metadata.last_modified_by = Some(text);
                    }
                },
                b"revision" => {
                    if let Some(text) = read_text_element(&mut reader)? {
                        metadata.revision = Some(text);
                    }
                },
                b"category" => {
                    if let Some(text) = read_text_element(&mut reader)? {
                        metadata.category = Some(text);
                    }
                },
                b"created" => {
                    if let Some(text) = read_text_element(&mut reader)? {
                        metadata.created = Some(normalize_datetime(&text));
                    }
                },
                b"modified" => {
                    if let Some(text) = read_text_element(&mut reader)? {
                        metadata.modified = Some(normalize_datetime(&text));
                    }
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(())
}

/// Parse `docProps/app.xml`, filling fields the core part does not carry.
/// Counts are taken only when nothing else supplied them.
pub fn parse_app_properties(xml: &[u8], metadata: &mut Metadata) -> Result<()> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"Application" => {
                        if let Some(text) = read_text_element(&mut reader)? {
                            metadata.application.get_or_insert(text);
                        }
                    },
                    b"AppVersion" => {
                        if let Some(text) = read_text_element(&mut reader)? {
                            metadata.app_version.get_or_insert(text);
                        }
                    },
                    b"Company" => {
                        if let Some(text) = read_text_element(&mut reader)? {
                            metadata.company.get_or_insert(text);
                        }
                    },
                    b"Manager" => {
                        if let Some(text) = read_text_element(&mut reader)? {
                            metadata.manager.get_or_insert(text);
                        }
                    },
                    b"Template" => {
                        if let Some(text) = read_text_element(&mut reader)? {
                            metadata.template.get_or_insert(text);
                        }
                    },
                    b"PresentationFormat" => {
                        if let Some(text) = read_text_element(&mut reader)? {
                            metadata.presentation_format.get_or_insert(text);
                        }
                    },
                    b"Slides" => read_count(&mut reader, &mut metadata.total_slides)?,
                    b"Words" => read_count(&mut reader, &mut metadata.total_words)?,
                    b"Paragraphs" => read_count(&mut reader, &mut metadata.total_paragraphs)?,
                    _ => {},
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(())
}

/// Read the text content of the element just opened.
fn read_text_element(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                if let Ok(t) = e.unescape() {
                    text.push_str(&t);
                }
            },
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

fn read_count(reader: &mut Reader<&[u8]>, field: &mut u32) -> Result<()> {
    if let Some(text) = read_text_element(reader)?
        && *field == 0
        && let Ok(value) = text.parse::<u32>()
    {
        *field = value;
    }
    Ok(())
}

/// Re-format an ISO 8601 timestamp as canonical RFC3339; unparseable values
/// pass through unchanged.
fn normalize_datetime(text: &str) -> String {
    parse_datetime(text)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| text.to_string())
}

/// Parse the datetime formats `dcterms:created`/`modified` appear in.
fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(text, format) {
            return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_core_properties() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
                   xmlns:dc="http://purl.org/dc/elements/1.1/"
                   xmlns:dcterms="http://purl.org/dc/terms/">
    <dc:title>Launch Plan</dc:title>
    <dc:subject>Roadmap</dc:subject>
    <dc:creator>Dana</dc:creator>
    <cp:keywords>launch, roadmap</cp:keywords>
    <dc:description>Quarterly launch overview</dc:description>
    <cp:lastModifiedBy>Sam</cp:lastModifiedBy>
    <cp:revision>7</cp:revision>
    <cp:category>Planning</cp:category>
    <dcterms:created>2023-10-10T14:30:00Z</dcterms:created>
    <dcterms:modified>2023-11-02T09:15:00Z</dcterms:modified>
</cp:coreProperties>"#;

        let mut metadata = Metadata::default();
        parse_core_properties(xml, &mut metadata).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Launch Plan"));
        assert_eq!(metadata.creator.as_deref(), Some("Dana"));
        assert_eq!(metadata.last_modified_by.as_deref(), Some("Sam"));
        assert_eq!(metadata.revision.as_deref(), Some("7"));
        assert_eq!(metadata.created.as_deref(), Some("2023-10-10T14:30:00Z"));
        assert_eq!(metadata.modified.as_deref(), Some("2023-11-02T09:15:00Z"));
    }

    #[test]
    fn test_parse_app_properties() {
        let xml = br#"<?xml version="1.0"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
    <Application>Microsoft Office PowerPoint</Application>
    <AppVersion>16.0000</AppVersion>
    <Company>Acme</Company>
    <PresentationFormat>Widescreen</PresentationFormat>
    <Slides>12</Slides>
    <Words>345</Words>
    <Paragraphs>89</Paragraphs>
</Properties>"#;

        let mut metadata = Metadata::default();
        parse_app_properties(xml, &mut metadata).unwrap();
        assert_eq!(
            metadata.application.as_deref(),
            Some("Microsoft Office PowerPoint")
        );
        assert_eq!(metadata.app_version.as_deref(), Some("16.0000"));
        assert_eq!(metadata.presentation_format.as_deref(), Some("Widescreen"));
        assert_eq!(metadata.total_slides, 12);
        assert_eq!(metadata.total_words, 345);
        assert_eq!(metadata.total_paragraphs, 89);
    }

    #[test]
    fn test_app_counts_do_not_override() {
        let xml = br#"<Properties><Words>10</Words></Properties>"#;
        let mut metadata = Metadata {
            total_words: 99,
            ..Default::default()
        };
        parse_app_properties(xml, &mut metadata).unwrap();
        assert_eq!(metadata.total_words, 99);
    }

    #[test]
    fn test_datetime_fallback_formats() {
        assert_eq!(normalize_datetime("2023-10-10T14:30:00"), "2023-10-10T14:30:00Z");
        assert_eq!(
            normalize_datetime("2023-10-10T14:30:00.1234567Z"),
            "2023-10-10T14:30:00Z"
        );
        assert_eq!(normalize_datetime("last tuesday"), "last tuesday");
    }

    #[test]
    fn test_escaped_entities_unescaped() {
        let xml = br#"<cp:coreProperties xmlns:cp="c" xmlns:dc="d">
            <dc:title>Q&amp;A Session</dc:title></cp:coreProperties>"#;
        let mut metadata = Metadata::default();
        parse_core_properties(xml, &mut metadata).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Q&A Session"));
    }
}
