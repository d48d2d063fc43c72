//! Theme decoding (`ppt/theme/theme{n}.xml`).

use crate::model::Theme;
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Color-scheme roles in their scheme order.
const COLOR_ROLES: &[&[u8]] = &[
    b"dk1", b"lt1", b"dk2", b"lt2", b"accent1", b"accent2", b"accent3", b"accent4", b"accent5",
    b"accent6", b"hlink", b"folHlink",
];

/// Decode a theme part into its name, color scheme and font pair.
///
/// Colors are rendered as `"{role}: #RRGGBB"`; fonts as
/// `"Major: {typeface}"` / `"Minor: {typeface}"`.
pub fn parse_theme_xml(xml: &[u8]) -> Result<Theme> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut theme = Theme::default();
    let mut in_color_scheme = false;
    let mut in_major_font = false;
    let mut in_minor_font = false;
    let mut current_role: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"theme" => {
                        if let Some(value) = attr_value(e, b"name") {
                            theme.name = value;
                        }
                    },
                    b"clrScheme" => in_color_scheme = true,
                    b"majorFont" => in_major_font = true,
                    b"minorFont" => in_minor_font = true,
                    b"latin" if in_major_font || in_minor_font => {
                        if let Some(typeface) = attr_value(e, b"typeface") {
                            let label = if in_major_font { "Major" } else { "Minor" };
                            theme.fonts.push(format!("{}: {}", label, typeface));
                        }
                    },
                    b"srgbClr" if in_color_scheme => {
                        if let (Some(role), Some(value)) =
                            (current_role.as_deref(), attr_value(e, b"val"))
                        {
                            theme
                                .colors
                                .push(format!("{}: #{}", role, value.to_uppercase()));
                            current_role = None;
                        }
                    },
                    b"sysClr" if in_color_scheme => {
                        // System colors carry their resolved RGB in lastClr.
                        if let (Some(role), Some(value)) =
                            (current_role.as_deref(), attr_value(e, b"lastClr"))
                        {
                            theme
                                .colors
                                .push(format!("{}: #{}", role, value.to_uppercase()));
                            current_role = None;
                        }
                    },
                    role if in_color_scheme && COLOR_ROLES.contains(&role) => {
                        current_role =
                            Some(String::from_utf8_lossy(role).to_string());
                    },
                    _ => {},
                }
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"clrScheme" => in_color_scheme = false,
                b"majorFont" => in_major_font = false,
                b"minorFont" => in_minor_font = false,
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(theme)
}

fn attr_value(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| String::from_utf8(a.value.into_owned()).ok())
}
