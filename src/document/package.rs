use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::substitute::{substitute, Placeholders};
use super::xml::Part;
use super::DocumentError;

pub const MAIN_PART: &str = "word/document.xml";

/// A `.docx` archive with its text bearing parts parsed. Every other entry
/// is copied to the output without being decompressed.
pub struct Package {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    parts: BTreeMap<String, Part>,
}

fn is_text_part(name: &str) -> bool {
    name == MAIN_PART
        || ((name.starts_with("word/header") || name.starts_with("word/footer"))
            && name.ends_with(".xml"))
}

impl Package {
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        Self::from_bytes(fs::read(path)?)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DocumentError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if !is_text_part(file.name()) {
                continue;
            }
            let name = file.name().to_string();
            let mut source = String::new();
            file.read_to_string(&mut source)?;
            parts.insert(name, Part::parse(source)?);
        }

        if !parts.contains_key(MAIN_PART) {
            return Err(DocumentError::MissingPart {
                part: MAIN_PART.to_string(),
            });
        }
        Ok(Self { archive, parts })
    }

    #[cfg(test)]
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// Substitutes the body, headers and footers. Returns the number of
    /// paragraphs changed.
    pub fn substitute(&mut self, placeholders: &Placeholders) -> usize {
        self.parts
            .values_mut()
            .map(|part| substitute(&mut part.document, placeholders))
            .sum()
    }

    pub fn write_to<W: Write + Seek>(
        &mut self,
        writer: W,
    ) -> Result<W, DocumentError> {
        let mut zip = ZipWriter::new(writer);
        for i in 0..self.archive.len() {
            let file = self.archive.by_index(i)?;
            match self.parts.get(file.name()).filter(|p| p.is_edited()) {
                Some(part) => {
                    let options = FileOptions::default()
                        .compression_method(CompressionMethod::Deflated);
                    zip.start_file(file.name(), options)?;
                    zip.write_all(part.render().as_bytes())?;
                }
                None => zip.raw_copy_file(file)?,
            }
        }
        Ok(zip.finish()?)
    }

    pub fn save(&mut self, path: &Path) -> Result<(), DocumentError> {
        self.write_to(File::create(path)?)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn docx_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        zip.start_file(*name, FileOptions::default()).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "<w:document xmlns:w=\"urn:w\"><w:body>\
         <w:p><w:r><w:t>Lessee: {{CLIENT_NAME}}</w:t></w:r></w:p>\
         <w:p><w:r><w:t>Signature</w:t></w:r></w:p>\
         </w:body></w:document>";
    const HEADER: &str = "<w:hdr xmlns:w=\"urn:w\">\
         <w:p><w:r><w:t>Contract {{CONTRACT_NUMBER}}</w:t></w:r></w:p></w:hdr>";
    const FOOTER: &str =
        "<w:ftr xmlns:w=\"urn:w\"><w:p><w:r><w:t>Page</w:t></w:r></w:p></w:ftr>";
    const IMAGE: &[u8] = &[0x89, b'P', b'N', b'G', 0, 1, 2, 3];

    fn template() -> Vec<u8> {
        docx_bytes(&[
            ("[Content_Types].xml", b"<Types/>".as_slice()),
            (MAIN_PART, BODY.as_bytes()),
            ("word/header1.xml", HEADER.as_bytes()),
            ("word/footer1.xml", FOOTER.as_bytes()),
            ("word/media/image1.png", IMAGE),
        ])
    }

    fn placeholders() -> Placeholders {
        [("{{CLIENT_NAME}}", "Ivanov Ivan"), ("{{CONTRACT_NUMBER}}", "5")]
            .into_iter()
            .collect()
    }

    fn texts(package: &Package, part: &str) -> Vec<String> {
        package
            .part(part)
            .unwrap()
            .document
            .paragraphs()
            .iter()
            .map(|p| p.text())
            .collect()
    }

    fn entry(bytes: &[u8], name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        content
    }

    #[test]
    fn parses_body_headers_and_footers() {
        let package = Package::from_bytes(template()).unwrap();
        let names: Vec<&str> = package.part_names().collect();
        assert_eq!(
            names,
            vec![MAIN_PART, "word/footer1.xml", "word/header1.xml"]
        );
    }

    #[test]
    fn substitutes_every_text_part() {
        let mut package = Package::from_bytes(template()).unwrap();
        assert_eq!(package.substitute(&placeholders()), 2);

        let written = package.write_to(Cursor::new(Vec::new())).unwrap();
        let bytes = written.into_inner();
        let reread = Package::from_bytes(bytes.clone()).unwrap();

        assert_eq!(
            texts(&reread, MAIN_PART),
            vec!["Lessee: Ivanov Ivan", "Signature"]
        );
        assert_eq!(texts(&reread, "word/header1.xml"), vec!["Contract 5"]);
        assert_eq!(entry(&bytes, "word/footer1.xml"), FOOTER.as_bytes());
        assert_eq!(entry(&bytes, "word/media/image1.png"), IMAGE);
        assert_eq!(entry(&bytes, "[Content_Types].xml"), b"<Types/>");
    }

    #[test]
    fn keeps_entry_order() {
        let mut package = Package::from_bytes(template()).unwrap();
        package.substitute(&placeholders());
        let bytes = package.write_to(Cursor::new(Vec::new())).unwrap().into_inner();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                MAIN_PART,
                "word/header1.xml",
                "word/footer1.xml",
                "word/media/image1.png",
            ]
        );
    }

    #[test]
    fn archive_without_document_is_rejected() {
        let bytes = docx_bytes(&[("word/header1.xml", HEADER.as_bytes())]);
        assert!(matches!(
            Package::from_bytes(bytes),
            Err(DocumentError::MissingPart { .. })
        ));
    }

    #[test]
    fn non_archive_is_rejected() {
        assert!(matches!(
            Package::from_bytes(b"not a zip".to_vec()),
            Err(DocumentError::Archive { .. })
        ));
    }
}
