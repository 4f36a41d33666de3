use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{ffi, params, Connection};

use crate::error::{ContactError, ContactResult};
use crate::model::{Contact, ContactKey, Id, NewContact};

const SELECT_COLUMNS: &str = "SELECT id, name, phone, email, address, created_at FROM contacts";

/// Insert a contact stamped with the current time.
pub fn insert(conn: &Connection, contact: &NewContact) -> ContactResult<Contact> {
    insert_at(conn, contact, Utc::now())
}

/// Insert a contact with an explicit creation time.
/// A UNIQUE(name, phone, email) violation is reported as `DuplicateContact`.
pub fn insert_at(
    conn: &Connection,
    contact: &NewContact,
    created_at: DateTime<Utc>,
) -> ContactResult<Contact> {
    conn.execute(
        "INSERT INTO contacts (name, phone, email, address, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            contact.name,
            contact.phone,
            contact.email,
            contact.address,
            format_timestamp(created_at),
        ],
    )
    .map_err(map_constraint)?;

    Ok(Contact {
        id: Id::new(conn.last_insert_rowid()),
        name: contact.name.clone(),
        phone: contact.phone.clone(),
        email: contact.email.clone(),
        address: contact.address.clone(),
        created_at: parse_timestamp(&format_timestamp(created_at))?,
    })
}

/// Overwrite the editable fields. `created_at` is left untouched.
/// Returns false when no row has the given id.
pub fn update(conn: &Connection, id: Id<Contact>, fields: &NewContact) -> ContactResult<bool> {
    let changed = conn
        .execute(
            "UPDATE contacts SET name = ?1, phone = ?2, email = ?3, address = ?4 WHERE id = ?5",
            params![fields.name, fields.phone, fields.email, fields.address, id.value],
        )
        .map_err(map_constraint)?;
    Ok(changed > 0)
}

/// Returns false when no row has the given id.
pub fn delete(conn: &Connection, id: Id<Contact>) -> ContactResult<bool> {
    let changed = conn.execute("DELETE FROM contacts WHERE id = ?1", params![id.value])?;
    Ok(changed > 0)
}

pub fn find_by_id(conn: &Connection, id: Id<Contact>) -> ContactResult<Option<Contact>> {
    let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;

    let result = stmt.query_row(params![id.value], |row| Ok(row_to_contact(row)));

    match result {
        Ok(contact) => Ok(Some(contact?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All contacts, newest first.
pub fn find_all(conn: &Connection) -> ContactResult<Vec<Contact>> {
    let mut stmt = conn.prepare(&format!(
        "{} ORDER BY created_at DESC, id DESC",
        SELECT_COLUMNS
    ))?;

    let contacts = stmt
        .query_map([], |row| Ok(row_to_contact(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(contacts)
}

/// Case-insensitive substring match over name, phone, email and address,
/// newest first. SQLite's LOWER/LIKE only fold ASCII, so the match runs
/// here on full Unicode lowercase.
pub fn search(conn: &Connection, query: &str) -> ContactResult<Vec<Contact>> {
    let needle = query.trim().to_lowercase();
    let all = find_all(conn)?;
    if needle.is_empty() {
        return Ok(all);
    }

    Ok(all
        .into_iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle)
                || c.phone.to_lowercase().contains(&needle)
                || c.email.to_lowercase().contains(&needle)
                || c
                    .address
                    .as_ref()
                    .map(|a| a.to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
        .collect())
}

/// Whether a row other than `exclude` has exactly this (name, phone, email).
pub fn exists_with_key(
    conn: &Connection,
    key: ContactKey<'_>,
    exclude: Option<Id<Contact>>,
) -> ContactResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(
             SELECT 1 FROM contacts
             WHERE name = ?1 AND phone = ?2 AND email = ?3
             AND (?4 IS NULL OR id != ?4)
         )",
        params![key.name, key.phone, key.email, exclude.map(|id| id.value)],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn count(conn: &Connection) -> ContactResult<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
    Ok(n as usize)
}

fn map_constraint(e: rusqlite::Error) -> ContactError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _) if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE => {
            ContactError::DuplicateContact
        }
        _ => ContactError::Database(e),
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> ContactResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ContactError::Other(format!("Invalid timestamp '{}': {}", s, e)))
}

fn row_to_contact(row: &rusqlite::Row) -> ContactResult<Contact> {
    let created_at: String = row.get(5).map_err(rusqlite::Error::from)?;

    Ok(Contact {
        id: Id::new(row.get(0).map_err(rusqlite::Error::from)?),
        name: row.get(1).map_err(rusqlite::Error::from)?,
        phone: row.get(2).map_err(rusqlite::Error::from)?,
        email: row.get(3).map_err(rusqlite::Error::from)?,
        address: row.get(4).map_err(rusqlite::Error::from)?,
        created_at: parse_timestamp(&created_at)?,
    })
}
