use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::Id;

/// Where a submitted contact is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveTarget {
    #[default]
    Db,
    Xml,
}

/// Which store a contact listing reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Db,
    Xml,
}

impl SaveTarget {
    /// Accepts `db`/`xml` (case-insensitive). Anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "db" | "database" => Some(SaveTarget::Db),
            "xml" => Some(SaveTarget::Xml),
            _ => None,
        }
    }
}

impl DataSource {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "db" | "database" => Some(DataSource::Db),
            "xml" => Some(DataSource::Xml),
            _ => None,
        }
    }
}

/// Raw, unvalidated form input.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub save_to: SaveTarget,
}

/// A validated contact that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
}

impl NewContact {
    pub fn key(&self) -> ContactKey<'_> {
        ContactKey {
            name: &self.name,
            phone: &self.phone,
            email: &self.email,
        }
    }
}

/// The (name, phone, email) triple that identifies a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactKey<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
}

/// A contact row in the relational store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: Id<Contact>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    pub fn key(&self) -> ContactKey<'_> {
        ContactKey {
            name: &self.name,
            phone: &self.phone,
            email: &self.email,
        }
    }
}

/// A record read back from the primary XML document. Missing children
/// are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlContact {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// A record extracted from an uploaded XML file. Only the fields that were
/// present in the document are `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialContact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl PartialContact {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.email.is_none() && self.address.is_none()
    }
}
