use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{ContactError, ContactResult};
use crate::model::{
    PartialContact, UploadedFile, XmlDownload, XmlFileInfo, XmlFileListing, XML_CONTENT_TYPE,
};
use crate::xml::tree::{self, Element};
use crate::xml::{ADDRESS_TAG, EMAIL_TAG, NAME_TAG, PHONE_TAG, RECORD_TAG, XML_EXTENSION};

const MAX_NAME_ATTEMPTS: usize = 16;

/// The directory of XML files: the primary document plus uploads.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    dir: PathBuf,
    max_upload_bytes: u64,
}

impl FileCatalog {
    pub fn new(dir: impl Into<PathBuf>, max_upload_bytes: u64) -> Self {
        Self {
            dir: dir.into(),
            max_upload_bytes,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.contacts_dir(), config.max_upload_bytes)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the catalog directory when it is missing.
    pub fn ensure_dir(&self) -> ContactResult<&Path> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(&self.dir)
    }

    /// Every `.xml` file in the directory, sorted by name.
    pub fn list_files(&self) -> ContactResult<Vec<XmlFileInfo>> {
        self.ensure_dir()?;

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let filename = entry.file_name().to_string_lossy().into_owned();
            if !filename.ends_with(XML_EXTENSION) {
                continue;
            }
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let path = entry.path();
            files.push(XmlFileInfo {
                is_valid: validate(&path),
                filename,
                path,
                size_bytes: metadata.len(),
            });
        }

        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }

    /// Each file with the contacts extracted from it.
    pub fn list_with_contacts(&self) -> ContactResult<Vec<XmlFileListing>> {
        Ok(self
            .list_files()?
            .into_iter()
            .map(|info| {
                let contacts = extract_contacts(&info.path);
                XmlFileListing { info, contacts }
            })
            .collect())
    }

    /// Contacts of one catalog file.
    pub fn view(&self, filename: &str) -> ContactResult<Vec<PartialContact>> {
        let path = self.resolve(filename)?;
        if !validate(&path) {
            return Err(ContactError::MalformedDocument(filename.to_string()));
        }
        Ok(extract_contacts(&path))
    }

    /// Store an uploaded document under a generated name. Oversized payloads
    /// are rejected before anything is written; content that does not parse
    /// is removed again.
    pub fn upload(&self, original_name: &str, bytes: &[u8]) -> ContactResult<UploadedFile> {
        let size = bytes.len() as u64;
        if size > self.max_upload_bytes {
            return Err(ContactError::validation(
                "xml_file",
                format!(
                    "File is too large ({} bytes, limit is {} bytes)",
                    size, self.max_upload_bytes
                ),
            ));
        }

        self.ensure_dir()?;
        let (stored_name, path) = self.write_new(bytes)?;

        if let Err(e) = tree::parse_file(&path) {
            warn!(
                "event=xml_upload module=catalog status=rejected original={} error={}",
                original_name, e
            );
            if let Err(remove_err) = std::fs::remove_file(&path) {
                warn!(
                    "event=xml_upload module=catalog status=cleanup_failed stored={} error={}",
                    stored_name, remove_err
                );
                return Err(remove_err.into());
            }
            return Err(match e {
                ContactError::Io(_) => e,
                other => ContactError::MalformedDocument(other.to_string()),
            });
        }

        info!(
            "event=xml_upload module=catalog status=ok original={} stored={} size_bytes={}",
            original_name, stored_name, size
        );
        Ok(UploadedFile {
            original_name: original_name.to_string(),
            stored_name,
            path,
            size_bytes: size,
        })
    }

    /// Write `bytes` under a fresh generated name. Existing files are never
    /// overwritten; a name that is already taken is drawn again.
    fn write_new(&self, bytes: &[u8]) -> ContactResult<(String, PathBuf)> {
        self.write_new_with(bytes, generate_filename)
    }

    fn write_new_with(
        &self,
        bytes: &[u8],
        mut next_name: impl FnMut() -> String,
    ) -> ContactResult<(String, PathBuf)> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let stored_name = next_name();
            let path = self.dir.join(&stored_name);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            if let Err(e) = file.write_all(bytes) {
                drop(file);
                if let Err(remove_err) = std::fs::remove_file(&path) {
                    warn!(
                        "event=xml_upload module=catalog status=cleanup_failed stored={} error={}",
                        stored_name, remove_err
                    );
                }
                return Err(e.into());
            }
            return Ok((stored_name, path));
        }
        Err(ContactError::Other(
            "Could not find a free name for the uploaded file".to_string(),
        ))
    }

    /// Raw bytes of a catalog file, served as an XML attachment.
    pub fn download(&self, filename: &str) -> ContactResult<XmlDownload> {
        let path = self.resolve(filename)?;
        if !filename.ends_with(XML_EXTENSION) {
            return Err(ContactError::validation("filename", "File is not XML"));
        }

        let bytes = std::fs::read(&path)?;
        Ok(XmlDownload {
            filename: filename.to_string(),
            content_type: XML_CONTENT_TYPE,
            bytes,
        })
    }

    /// Path of an existing file directly inside the catalog directory.
    /// Names carrying path components never resolve.
    fn resolve(&self, filename: &str) -> ContactResult<PathBuf> {
        let plain = !filename.is_empty()
            && filename != "."
            && filename != ".."
            && !filename.contains(['/', '\\']);
        let path = self.dir.join(filename);
        if !plain || !path.is_file() {
            return Err(ContactError::not_found("File", filename));
        }
        Ok(path)
    }
}

/// `contacts_<8 hex chars>.xml`
pub fn generate_filename() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("contacts_{}{}", &hex[..8], XML_EXTENSION)
}

/// Whether the file parses as a well-formed document. Never fails.
pub fn validate(path: &Path) -> bool {
    tree::parse_file(path).is_ok()
}

/// `Contact` records anywhere below the root. Fields that are absent stay
/// `None`; records with no fields at all are skipped. Invalid files yield
/// nothing.
pub fn extract_contacts(path: &Path) -> Vec<PartialContact> {
    match tree::parse_file(path) {
        Ok(root) => contacts_in(&root),
        Err(_) => Vec::new(),
    }
}

pub fn contacts_in(root: &Element) -> Vec<PartialContact> {
    root.descendants_named(RECORD_TAG)
        .into_iter()
        .map(|record| {
            let field = |tag: &str| record.child(tag).map(|e| e.text().unwrap_or_default());
            PartialContact {
                name: field(NAME_TAG),
                phone: field(PHONE_TAG),
                email: field(EMAIL_TAG),
                address: field(ADDRESS_TAG),
            }
        })
        .filter(|c| !c.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_match_pattern() {
        let name = generate_filename();
        assert!(name.starts_with("contacts_"));
        assert!(name.ends_with(".xml"));
        let hex = &name["contacts_".len()..name.len() - 4];
        assert_eq!(hex.len(), 8);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn write_new_skips_names_already_taken() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FileCatalog::new(dir.path(), 1024);
        std::fs::write(dir.path().join("contacts_00000000.xml"), "<old/>").unwrap();

        let mut names = vec!["contacts_11111111.xml", "contacts_00000000.xml"];
        let (stored, path) = catalog
            .write_new_with(b"<new/>", || names.pop().unwrap().to_string())
            .unwrap();

        assert_eq!(stored, "contacts_11111111.xml");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<new/>");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("contacts_00000000.xml")).unwrap(),
            "<old/>"
        );
    }

    #[test]
    fn write_new_gives_up_when_every_name_is_taken() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FileCatalog::new(dir.path(), 1024);
        std::fs::write(dir.path().join("contacts_00000000.xml"), "<old/>").unwrap();

        let result = catalog.write_new_with(b"<new/>", || "contacts_00000000.xml".to_string());
        assert!(matches!(result, Err(ContactError::Other(_))));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("contacts_00000000.xml")).unwrap(),
            "<old/>"
        );
    }

    #[test]
    fn contacts_in_skips_records_without_fields() {
        let root = tree::parse(
            "<Contacts><Contact><Name>A</Name></Contact><Contact><Other/></Contact></Contacts>",
        )
        .unwrap();
        let contacts = contacts_in(&root);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name.as_deref(), Some("A"));
        assert_eq!(contacts[0].address, None);
    }

    #[test]
    fn present_but_empty_field_is_some_empty() {
        let root = tree::parse("<r><Contact><Phone/></Contact></r>").unwrap();
        let contacts = contacts_in(&root);
        assert_eq!(contacts[0].phone.as_deref(), Some(""));
    }
}
