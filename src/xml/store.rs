use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::tree::{self, Element};
use super::{ADDRESS_TAG, EMAIL_TAG, NAME_TAG, PHONE_TAG, RECORD_TAG, ROOT_TAG};
use crate::error::ContactResult;
use crate::model::{NewContact, XmlContact};

/// The primary XML document: a `Contacts` root holding `Contact` records.
///
/// Every append re-reads and rewrites the whole file. There is no locking,
/// so the store assumes a single writer: two processes appending at the
/// same time can lose one of the records. The rewrite goes through a
/// sibling temporary file and a rename, so readers never see a torn file.
#[derive(Debug, Clone)]
pub struct XmlContactStore {
    path: PathBuf,
}

impl XmlContactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record as the last child of the root. Never checks for
    /// duplicates.
    pub fn append(&self, contact: &NewContact) -> ContactResult<()> {
        let mut root = if self.path.exists() {
            tree::parse_file(&self.path)?
        } else {
            debug!(
                "event=xml_create module=xml path={}",
                self.path.display()
            );
            Element::new(ROOT_TAG)
        };

        root.push(record_element(contact));

        let bytes = tree::to_bytes(&root)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("xml.tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, &self.path)?;

        info!(
            "event=xml_append module=xml status=ok path={} records={}",
            self.path.display(),
            root.children_named(RECORD_TAG).count()
        );
        Ok(())
    }

    /// All records under the root. A missing file is an empty store; a
    /// malformed one is logged and also reads as empty.
    pub fn read_all(&self) -> Vec<XmlContact> {
        match self.try_read_all() {
            Ok(contacts) => contacts,
            Err(e) => {
                warn!(
                    "event=xml_read module=xml status=error path={} error={}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    pub fn try_read_all(&self) -> ContactResult<Vec<XmlContact>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let root = tree::parse_file(&self.path)?;
        Ok(root
            .children_named(RECORD_TAG)
            .map(|record| XmlContact {
                name: field_text(record, NAME_TAG),
                phone: field_text(record, PHONE_TAG),
                email: field_text(record, EMAIL_TAG),
                address: field_text(record, ADDRESS_TAG),
            })
            .collect())
    }
}

fn record_element(contact: &NewContact) -> Element {
    let mut record = Element::new(RECORD_TAG);
    record.push(Element::with_text(NAME_TAG, &contact.name));
    record.push(Element::with_text(PHONE_TAG, &contact.phone));
    record.push(Element::with_text(EMAIL_TAG, &contact.email));
    if let Some(address) = contact.address.as_deref().filter(|a| !a.is_empty()) {
        record.push(Element::with_text(ADDRESS_TAG, address));
    }
    record
}

fn field_text(record: &Element, tag: &str) -> String {
    record.child(tag).and_then(|e| e.text()).unwrap_or_default()
}
