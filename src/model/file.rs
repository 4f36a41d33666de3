use std::path::PathBuf;

use serde::Serialize;

use super::contact::PartialContact;

pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Metadata for an XML file in the catalog directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XmlFileInfo {
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub is_valid: bool,
}

/// A catalog entry together with the contacts it holds.
#[derive(Debug, Clone, Serialize)]
pub struct XmlFileListing {
    pub info: XmlFileInfo,
    pub contacts: Vec<PartialContact>,
}

impl XmlFileListing {
    pub fn contacts_count(&self) -> usize {
        self.contacts.len()
    }
}

/// A file stored by an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub original_name: String,
    pub stored_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// The payload of a download: raw bytes plus response metadata.
#[derive(Debug, Clone)]
pub struct XmlDownload {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl XmlDownload {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}
