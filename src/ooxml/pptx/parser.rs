//! Top-level .pptx parsing: package in, normalized presentation out.

use super::{media, notes, slide, theme};
use crate::model::{FileType, Presentation, Slide};
use crate::ooxml::container::Container;
use crate::ooxml::custom::parse_custom_properties;
use crate::ooxml::metadata::{parse_app_properties, parse_core_properties};
use chrono::{DateTime, SecondsFormat, Utc};

/// Parse a .pptx presentation.
///
/// Total: a package whose ZIP directory cannot be read yields the diagnostic
/// error presentation; any individual part that is missing or fails XML
/// decoding is skipped while the other parts still contribute.
pub fn parse(
    bytes: &[u8],
    file_name: &str,
    file_size: u64,
    modified: Option<DateTime<Utc>>,
) -> Presentation {
    let mut container = match Container::from_bytes(bytes) {
        Ok(container) => container,
        Err(e) => {
            log::warn!("{}: unreadable package: {}", file_name, e);
            return Presentation::diagnostic_error(
                file_name,
                file_size,
                FileType::Pptx,
                format!("Could not read presentation archive: {}", e),
            );
        },
    };

    let mut pres = Presentation::new(file_name, file_size, FileType::Pptx);

    read_document_properties(&mut container, &mut pres, file_name);
    read_slides(&mut container, &mut pres, file_name);
    read_themes(&mut container, &mut pres, file_name);
    read_masters(&mut container, &mut pres);
    pres.media = media::collect_media(&mut container);

    if pres.metadata.modified.is_none()
        && let Some(mtime) = modified
    {
        pres.metadata.modified = Some(mtime.to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    pres.finalize();
    pres
}

fn read_document_properties(container: &mut Container, pres: &mut Presentation, file_name: &str) {
    if let Some(xml) = container.read("docProps/core.xml")
        && let Err(e) = parse_core_properties(&xml, &mut pres.metadata)
    {
        log::debug!("{}: core properties skipped: {}", file_name, e);
    }
    if let Some(xml) = container.read("docProps/app.xml")
        && let Err(e) = parse_app_properties(&xml, &mut pres.metadata)
    {
        log::debug!("{}: app properties skipped: {}", file_name, e);
    }
    if let Some(xml) = container.read("docProps/custom.xml") {
        match parse_custom_properties(&xml) {
            Ok(props) => pres.custom_properties.extend(props),
            Err(e) => log::debug!("{}: custom properties skipped: {}", file_name, e),
        }
    }
}

fn read_slides(container: &mut Container, pres: &mut Presentation, file_name: &str) {
    for (n, part_name) in numbered_parts(container.names(), "ppt/slides/slide") {
        let Some(xml) = container.read(&part_name) else {
            continue;
        };
        let mut content = match slide::parse_slide_xml(&xml) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("{}: {} skipped: {}", file_name, part_name, e);
                continue;
            },
        };

        let mut out = Slide::new(0);
        // Without a title placeholder the first text paragraph serves as the
        // title and stays out of the body.
        out.title = match content.title.take() {
            Some(title) => title,
            None if !content.paragraphs.is_empty() => content.paragraphs.remove(0),
            None => String::new(),
        };
        out.text_content = content.paragraphs;
        out.shapes = content.shapes;
        out.tables = content.tables;
        out.images = content.images;

        let notes_name = format!("ppt/notesSlides/notesSlide{}.xml", n);
        if let Some(notes_xml) = container.read(&notes_name) {
            match notes::parse_notes_xml(&notes_xml) {
                Ok(text) => out.notes = text,
                Err(e) => log::debug!("{}: {} skipped: {}", file_name, notes_name, e),
            }
        }

        pres.slides.push(out);
    }
}

fn read_themes(container: &mut Container, pres: &mut Presentation, file_name: &str) {
    for (_, part_name) in numbered_parts(container.names(), "ppt/theme/theme") {
        let Some(xml) = container.read(&part_name) else {
            continue;
        };
        match theme::parse_theme_xml(&xml) {
            Ok(theme) => pres.themes.push(theme),
            Err(e) => log::debug!("{}: {} skipped: {}", file_name, part_name, e),
        }
    }
}

fn read_masters(container: &mut Container, pres: &mut Presentation) {
    for (n, part_name) in numbered_parts(container.names(), "ppt/slideMasters/slideMaster") {
        let name = container
            .read(&part_name)
            .and_then(|xml| slide::parse_csld_name(&xml))
            .unwrap_or_else(|| format!("Slide Master {}", n));
        pres.master_slides.push(name);
    }
}

/// Find parts named `{prefix}{n}.xml` and return them sorted by `n`.
fn numbered_parts(names: &[String], prefix: &str) -> Vec<(u32, String)> {
    let mut parts: Vec<(u32, String)> = names
        .iter()
        .filter_map(|name| {
            let digits = name.strip_prefix(prefix)?.strip_suffix(".xml")?;
            let n: u32 = digits.parse().ok()?;
            Some((n, name.clone()))
        })
        .collect();
    parts.sort();
    parts
}
