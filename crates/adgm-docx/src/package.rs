//! Read a `.docx` zip package into memory and write it back.

use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::body::DocumentBody;
use crate::error::DocxError;

/// Zip entry holding the main document XML.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// All entries of a `.docx` package, in archive order.
#[derive(Debug, Clone)]
pub struct DocxPackage {
    entries: Vec<(String, Vec<u8>)>,
    document_index: usize,
}

impl DocxPackage {
    /// Read a package from in-memory bytes (e.g. an HTTP upload).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        Self::read(Cursor::new(bytes))
    }

    /// Read a package from a file on disk.
    pub fn from_path(path: &Path) -> Result<Self, DocxError> {
        Self::read(File::open(path)?)
    }

    fn read<R: Read + Seek>(reader: R) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(reader)?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            entries.push((name, data));
        }

        let document_index = entries
            .iter()
            .position(|(name, _)| name == DOCUMENT_PART)
            .ok_or_else(|| DocxError::MissingPart(DOCUMENT_PART.to_string()))?;

        Ok(Self {
            entries,
            document_index,
        })
    }

    /// Raw bytes of `word/document.xml`.
    pub fn document_xml(&self) -> &[u8] {
        &self.entries[self.document_index].1
    }

    /// Raw bytes of any part, by zip entry name.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    /// Entry names in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Parse the document body.
    pub fn body(&self) -> Result<DocumentBody, DocxError> {
        DocumentBody::parse(self.document_xml())
    }

    /// Document text as sent for analysis: top-level body paragraphs joined
    /// with `\n`. Table content is not included.
    pub fn body_text(&self) -> Result<String, DocxError> {
        Ok(self.body()?.text())
    }

    /// Serialize the package, substituting `document_xml` for the main part.
    /// Every other entry is written back with its original content.
    pub fn to_bytes_with_document(&self, document_xml: &[u8]) -> Result<Vec<u8>, DocxError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for (i, (name, data)) in self.entries.iter().enumerate() {
            if name.ends_with('/') {
                zip.add_directory(name.as_str(), options)?;
                continue;
            }
            zip.start_file(name.as_str(), options)?;
            if i == self.document_index {
                zip.write_all(document_xml)?;
            } else {
                zip.write_all(data)?;
            }
        }

        Ok(zip.finish()?.into_inner())
    }

    /// Serialize the package unchanged.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        self.to_bytes_with_document(self.document_xml())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    const DOC: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Hello</w:t></w:r></w:p></w:body></w:document>"#;

    #[test]
    fn reads_entries_and_document_part() {
        let bytes = create_zip(&[
            ("[Content_Types].xml", b"<Types/>"),
            (DOCUMENT_PART, DOC),
            ("word/styles.xml", b"<w:styles/>"),
        ]);
        let package = DocxPackage::from_bytes(&bytes).unwrap();

        assert_eq!(package.document_xml(), DOC);
        assert_eq!(package.part("word/styles.xml").unwrap(), b"<w:styles/>");
        assert_eq!(
            package.part_names().collect::<Vec<_>>(),
            vec!["[Content_Types].xml", DOCUMENT_PART, "word/styles.xml"]
        );
        assert_eq!(package.body_text().unwrap(), "Hello");
    }

    #[test]
    fn missing_document_part_is_rejected() {
        let bytes = create_zip(&[("[Content_Types].xml", b"<Types/>")]);
        let err = DocxPackage::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, DocxError::MissingPart(_)));
    }

    #[test]
    fn non_zip_bytes_are_rejected() {
        let err = DocxPackage::from_bytes(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, DocxError::Zip(_)));
    }

    #[test]
    fn rewrite_replaces_only_the_document_part() {
        let bytes = create_zip(&[
            ("[Content_Types].xml", b"<Types/>"),
            (DOCUMENT_PART, DOC),
            ("word/media/image1.png", &[0x89, 0x50, 0x4e, 0x47]),
        ]);
        let package = DocxPackage::from_bytes(&bytes).unwrap();

        let rewritten = package
            .to_bytes_with_document(b"<w:document><w:body/></w:document>")
            .unwrap();
        let reread = DocxPackage::from_bytes(&rewritten).unwrap();

        assert_eq!(reread.document_xml(), b"<w:document><w:body/></w:document>");
        assert_eq!(reread.part("[Content_Types].xml").unwrap(), b"<Types/>");
        assert_eq!(
            reread.part("word/media/image1.png").unwrap(),
            &[0x89, 0x50, 0x4e, 0x47]
        );
    }

    #[test]
    fn reads_from_path() {
        let bytes = create_zip(&[(DOCUMENT_PART, DOC)]);
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), &bytes).unwrap();

        let package = DocxPackage::from_path(tmp.path()).unwrap();
        assert_eq!(package.body_text().unwrap(), "Hello");
    }

    #[test]
    fn nonexistent_path_is_io_error() {
        let err = DocxPackage::from_path(Path::new("/nonexistent/file.docx")).unwrap_err();
        assert!(matches!(err, DocxError::Io(_)));
    }
}
