use log::error;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::contact_repo;
use crate::error::ContactResult;
use crate::model::{Contact, DataSource, XmlContact};
use crate::xml::XmlContactStore;

/// Contacts shown for a chosen data source.
#[derive(Debug, Clone)]
pub enum ContactListing {
    Db(Vec<Contact>),
    Xml(Vec<XmlContact>),
}

impl ContactListing {
    pub fn len(&self) -> usize {
        match self {
            ContactListing::Db(c) => c.len(),
            ContactListing::Xml(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn list_all(conn: &Connection) -> ContactResult<Vec<Contact>> {
    contact_repo::find_all(conn)
}

pub fn search(conn: &Connection, query: &str) -> ContactResult<Vec<Contact>> {
    contact_repo::search(conn, query)
}

/// List from either store. A failing database read is logged and shown as
/// an empty list.
pub fn list_for_source(
    conn: &Connection,
    xml_store: &XmlContactStore,
    source: DataSource,
) -> ContactListing {
    match source {
        DataSource::Db => ContactListing::Db(list_all(conn).unwrap_or_else(|e| {
            error!("event=contact_list module=queries status=error error={}", e);
            Vec::new()
        })),
        DataSource::Xml => ContactListing::Xml(xml_store.read_all()),
    }
}

#[derive(Debug, Serialize)]
struct SearchRow<'a> {
    id: i64,
    name: &'a str,
    phone: &'a str,
    email: &'a str,
    address: &'a str,
}

#[derive(Debug, Serialize)]
struct SearchResponse<'a> {
    contacts: Vec<SearchRow<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Search results as the JSON payload used by live search:
/// `{"contacts": [...], "query": "..."}`, blank fields shown as `"-"`.
/// `query` is left out when the query is empty.
pub fn search_json(conn: &Connection, query: &str) -> ContactResult<serde_json::Value> {
    let query = query.trim();
    let contacts = search(conn, query)?;

    let response = SearchResponse {
        contacts: contacts
            .iter()
            .map(|c| SearchRow {
                id: c.id.value,
                name: or_dash(&c.name),
                phone: or_dash(&c.phone),
                email: or_dash(&c.email),
                address: or_dash(c.address.as_deref().unwrap_or("")),
            })
            .collect(),
        query: (!query.is_empty()).then_some(query),
    };

    Ok(serde_json::to_value(response)?)
}
