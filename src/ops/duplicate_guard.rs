use rusqlite::Connection;

use crate::db::contact_repo;
use crate::error::{ContactError, ContactResult};
use crate::model::{Contact, ContactKey, Id};

/// Whether another stored contact has exactly this (name, phone, email).
/// Matching is case-sensitive and whole-field. `exclude` lets a record
/// keep its own values during an edit.
pub fn is_duplicate(
    conn: &Connection,
    key: ContactKey<'_>,
    exclude: Option<Id<Contact>>,
) -> ContactResult<bool> {
    contact_repo::exists_with_key(conn, key, exclude)
}

/// Fails with `DuplicateContact` when [`is_duplicate`] holds.
pub fn ensure_unique(
    conn: &Connection,
    key: ContactKey<'_>,
    exclude: Option<Id<Contact>>,
) -> ContactResult<()> {
    if is_duplicate(conn, key, exclude)? {
        return Err(ContactError::DuplicateContact);
    }
    Ok(())
}
