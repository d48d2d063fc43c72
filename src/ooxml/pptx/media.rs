//! Binary media collection from `ppt/media/`.

use crate::model::Media;
use crate::ooxml::container::Container;

/// Package prefix for embedded media.
const MEDIA_PREFIX: &str = "ppt/media/";

/// Collect every file under `ppt/media/`, base64-encoded, in numeric order
/// of the embedded index (`image1.png`, `image2.jpeg`, ...).
pub fn collect_media(container: &mut Container) -> Vec<Media> {
    let mut names: Vec<String> = container
        .names()
        .iter()
        .filter(|n| n.starts_with(MEDIA_PREFIX) && !n.ends_with('/'))
        .cloned()
        .collect();
    names.sort_by_key(|n| (embedded_index(n), n.clone()));

    let mut media = Vec::with_capacity(names.len());
    for name in names {
        let Some(bytes) = container.read(&name) else {
            continue;
        };
        let base_name = name.strip_prefix(MEDIA_PREFIX).unwrap_or(&name);
        let extension = base_name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        media.push(Media::from_bytes(base_name, extension, &bytes));
    }
    media
}

/// The numeric component of a media filename, for natural ordering.
fn embedded_index(name: &str) -> u32 {
    let digits: String = name
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_collect_media_classifies_and_orders() {
        let bytes = build_zip(&[
            ("ppt/media/image10.png", b"ten".as_slice()),
            ("ppt/media/image2.jpeg", b"two".as_slice()),
            ("ppt/media/clip1.mp4", b"video bytes".as_slice()),
            ("ppt/slides/slide1.xml", b"<sld/>".as_slice()),
        ]);
        let mut container = Container::from_bytes(&bytes).unwrap();
        let media = collect_media(&mut container);

        let names: Vec<&str> = media.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["clip1.mp4", "image2.jpeg", "image10.png"]);
        assert_eq!(media[0].media_type, "video");
        assert_eq!(media[1].media_type, "image");
        assert_eq!(media[1].extension, "jpeg");
        assert_eq!(media[2].size, 3);
    }
}
