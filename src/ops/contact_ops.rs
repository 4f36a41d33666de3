use log::{error, info};
use rusqlite::Connection;

use super::duplicate_guard;
use super::Outcome;
use crate::db::contact_repo;
use crate::error::{ContactError, ContactResult};
use crate::model::{Contact, ContactForm, Id, NewContact, SaveTarget};
use crate::validation;
use crate::xml::XmlContactStore;

/// Insert into the relational store unless the triple is already taken.
pub fn create_contact(conn: &Connection, contact: &NewContact) -> ContactResult<Contact> {
    duplicate_guard::ensure_unique(conn, contact.key(), None)?;
    let created = contact_repo::insert(conn, contact)?;
    info!(
        "event=contact_create module=ops status=ok id={}",
        created.id
    );
    Ok(created)
}

pub fn update_contact(
    conn: &Connection,
    contact_id: Id<Contact>,
    name: &str,
    phone: &str,
    email: &str,
    address: Option<&str>,
) -> ContactResult<Contact> {
    let existing = find_contact(conn, contact_id)?;
    let fields = validation::contact(name, phone, email, address)?;

    duplicate_guard::ensure_unique(conn, fields.key(), Some(contact_id))?;
    if !contact_repo::update(conn, contact_id, &fields)? {
        return Err(ContactError::not_found("Contact", contact_id));
    }

    Ok(Contact {
        id: existing.id,
        name: fields.name,
        phone: fields.phone,
        email: fields.email,
        address: fields.address,
        created_at: existing.created_at,
    })
}

pub fn delete_contact(conn: &Connection, contact_id: Id<Contact>) -> ContactResult<()> {
    if !contact_repo::delete(conn, contact_id)? {
        return Err(ContactError::not_found("Contact", contact_id));
    }
    info!(
        "event=contact_delete module=ops status=ok id={}",
        contact_id
    );
    Ok(())
}

pub fn find_contact(conn: &Connection, contact_id: Id<Contact>) -> ContactResult<Contact> {
    contact_repo::find_by_id(conn, contact_id)?
        .ok_or_else(|| ContactError::not_found("Contact", contact_id))
}

/// Validate a submitted form and store it where the form asks.
pub fn submit(conn: &Connection, xml_store: &XmlContactStore, form: &ContactForm) -> Outcome {
    let contact = match validation::contact(
        &form.name,
        &form.phone,
        &form.email,
        form.address.as_deref(),
    ) {
        Ok(c) => c,
        Err(e) => return Outcome::failed(e.to_string()),
    };

    match form.save_to {
        SaveTarget::Db => save_to_db(conn, &contact),
        SaveTarget::Xml => save_to_xml(xml_store, &contact),
    }
}

pub fn save_to_db(conn: &Connection, contact: &NewContact) -> Outcome {
    match create_contact(conn, contact) {
        Ok(_) => Outcome::ok("Contact saved to the database"),
        Err(ContactError::DuplicateContact) => {
            Outcome::failed("Contact already exists in the database")
        }
        Err(e) => {
            error!("event=contact_create module=ops status=error error={}", e);
            Outcome::failed(format!("Error saving to the database: {}", e))
        }
    }
}

/// Append to the XML document. No duplicate check is made.
pub fn save_to_xml(xml_store: &XmlContactStore, contact: &NewContact) -> Outcome {
    match xml_store.append(contact) {
        Ok(()) => Outcome::ok("Contact saved to the XML file"),
        Err(e) => {
            error!(
                "event=xml_append module=ops status=error path={} error={}",
                xml_store.path().display(),
                e
            );
            Outcome::failed("Error saving the contact to XML")
        }
    }
}

pub fn edit(
    conn: &Connection,
    contact_id: Id<Contact>,
    name: &str,
    phone: &str,
    email: &str,
    address: Option<&str>,
) -> Outcome {
    match update_contact(conn, contact_id, name, phone, email, address) {
        Ok(_) => Outcome::ok("Contact updated"),
        Err(ContactError::DuplicateContact) => {
            Outcome::failed("A contact with these details already exists")
        }
        Err(e @ (ContactError::NotFound { .. } | ContactError::Validation { .. })) => {
            Outcome::failed(e.to_string())
        }
        Err(e) => {
            error!(
                "event=contact_update module=ops status=error id={} error={}",
                contact_id, e
            );
            Outcome::failed(format!("Error updating the contact: {}", e))
        }
    }
}

pub fn remove(conn: &Connection, contact_id: Id<Contact>) -> Outcome {
    match delete_contact(conn, contact_id) {
        Ok(()) => Outcome::ok("Contact deleted"),
        Err(e @ ContactError::NotFound { .. }) => Outcome::failed(e.to_string()),
        Err(e) => {
            error!(
                "event=contact_delete module=ops status=error id={} error={}",
                contact_id, e
            );
            Outcome::failed(format!("Error deleting the contact: {}", e))
        }
    }
}
