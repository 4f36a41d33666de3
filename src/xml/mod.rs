pub mod tree;
pub mod store;

pub use store::XmlContactStore;

pub const ROOT_TAG: &str = "Contacts";
pub const RECORD_TAG: &str = "Contact";
pub const NAME_TAG: &str = "Name";
pub const PHONE_TAG: &str = "Phone";
pub const EMAIL_TAG: &str = "Email";
pub const ADDRESS_TAG: &str = "Address";

/// File name of the primary document inside the contacts directory.
pub const PRIMARY_FILE_NAME: &str = "contacts.xml";
pub const XML_EXTENSION: &str = ".xml";
