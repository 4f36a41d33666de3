use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("Contact already exists")]
    DuplicateContact,

    #[error("Malformed XML document: {0}")]
    MalformedDocument(String),

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl ContactError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ContactError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        ContactError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

pub type ContactResult<T> = Result<T, ContactError>;
