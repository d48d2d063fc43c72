//! ZIP container access for OOXML packages.

use super::error::{OoxmlError, Result};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// An OOXML package opened from an in-memory buffer.
///
/// Parts are decompressed on demand; a part that fails to decompress is
/// reported as absent rather than failing the whole package.
pub struct Container {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    names: Vec<String>,
}

impl Container {
    /// Open a package from raw bytes. Fails only when the ZIP central
    /// directory itself is unreadable.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| OoxmlError::Zip(e.to_string()))?;
        let names = archive.file_names().map(String::from).collect();
        Ok(Self { archive, names })
    }

    /// All member names in the package.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether a member exists.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Read a member's decompressed bytes. Missing or unreadable members
    /// yield `None`.
    pub fn read(&mut self, name: &str) -> Option<Vec<u8>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return None,
            Err(e) => {
                log::debug!("part {} unreadable: {}", name, e);
                return None;
            },
        };
        let mut data = Vec::with_capacity(file.size() as usize);
        match file.read_to_end(&mut data) {
            Ok(_) => Some(data),
            Err(e) => {
                log::debug!("part {} failed to decompress: {}", name, e);
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
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
    fn test_read_member() {
        let bytes = build_zip(&[("docProps/core.xml", b"<core/>")]);
        let mut container = Container::from_bytes(&bytes).unwrap();
        assert!(container.contains("docProps/core.xml"));
        assert_eq!(container.read("docProps/core.xml").unwrap(), b"<core/>");
        assert!(container.read("missing.xml").is_none());
    }

    #[test]
    fn test_invalid_archive_rejected() {
        assert!(Container::from_bytes(b"not a zip at all").is_err());
    }
}
