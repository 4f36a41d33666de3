use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ContactError, ContactResult};
use crate::model::NewContact;

pub const NAME_MAX_LEN: usize = 100;
pub const PHONE_MAX_LEN: usize = 20;
pub const EMAIL_MAX_LEN: usize = 254;
pub const ADDRESS_MAX_LEN: usize = 200;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Zа-яА-ЯёЁ\s\-.]+$").expect("name pattern compiles"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9\s\-()+]+$").expect("phone pattern compiles"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9-]{2,63}$",
    )
    .expect("email pattern compiles")
});

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> ContactResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(ContactError::validation(field, "This field is required"))
    } else {
        Ok(trimmed)
    }
}

/// Validates that a string has at most `max` characters.
pub fn max_length(value: &str, max: usize, field: &str) -> ContactResult<()> {
    let len = value.chars().count();
    if len > max {
        Err(ContactError::validation(
            field,
            format!("Ensure this value has at most {} characters (it has {})", max, len),
        ))
    } else {
        Ok(())
    }
}

/// Rejects characters that XML 1.0 documents cannot carry, such as C0
/// controls other than tab, newline and carriage return.
pub fn xml_chars(value: &str, field: &str) -> ContactResult<()> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(ContactError::validation(
            field,
            format!("Contains a character that is not allowed (U+{:04X})", c as u32),
        )),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Letters, whitespace, hyphens and periods only.
pub fn name(value: &str) -> ContactResult<String> {
    let trimmed = non_blank(value, "name")?;
    max_length(&trimmed, NAME_MAX_LEN, "name")?;
    xml_chars(&trimmed, "name")?;
    if !NAME_RE.is_match(&trimmed) {
        return Err(ContactError::validation(
            "name",
            "Name may only contain letters, spaces, hyphens and periods",
        ));
    }
    Ok(trimmed)
}

/// Digits, whitespace and `+-()` only.
pub fn phone(value: &str) -> ContactResult<String> {
    let trimmed = non_blank(value, "phone")?;
    max_length(&trimmed, PHONE_MAX_LEN, "phone")?;
    xml_chars(&trimmed, "phone")?;
    if !PHONE_RE.is_match(&trimmed) {
        return Err(ContactError::validation("phone", "Invalid phone number format"));
    }
    Ok(trimmed)
}

pub fn email(value: &str) -> ContactResult<String> {
    let trimmed = non_blank(value, "email")?;
    max_length(&trimmed, EMAIL_MAX_LEN, "email")?;
    if !EMAIL_RE.is_match(&trimmed) {
        return Err(ContactError::validation("email", "Enter a valid email address"));
    }
    Ok(trimmed)
}

/// Optional free text: trimmed, blank becomes `None`.
pub fn address(value: Option<&str>) -> ContactResult<Option<String>> {
    let trimmed = trim_optional(value);
    if let Some(a) = &trimmed {
        max_length(a, ADDRESS_MAX_LEN, "address")?;
        xml_chars(a, "address")?;
    }
    Ok(trimmed)
}

/// Runs every field validator and builds a [`NewContact`].
/// The first failing field is reported.
pub fn contact(
    name_value: &str,
    phone_value: &str,
    email_value: &str,
    address_value: Option<&str>,
) -> ContactResult<NewContact> {
    Ok(NewContact {
        name: name(name_value)?,
        phone: phone(phone_value)?,
        email: email(email_value)?,
        address: address(address_value)?,
    })
}

/// Trims an optional string, returning None if blank.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
