pub mod ids;
pub mod contact;
pub mod file;

// Re-exports for convenience
pub use ids::Id;
pub use contact::{
    Contact, ContactForm, ContactKey, DataSource, NewContact, PartialContact, SaveTarget, XmlContact,
};
pub use file::{UploadedFile, XmlDownload, XmlFileInfo, XmlFileListing, XML_CONTENT_TYPE};
