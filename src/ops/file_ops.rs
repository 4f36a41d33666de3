use log::error;

use super::Outcome;
use crate::catalog::FileCatalog;
use crate::error::ContactError;
use crate::model::{PartialContact, XmlDownload, XmlFileListing};

pub fn upload_xml(catalog: &FileCatalog, original_name: &str, bytes: &[u8]) -> Outcome {
    match catalog.upload(original_name, bytes) {
        Ok(file) => Outcome::ok(format!(
            "File {} uploaded and validated (stored as {})",
            file.original_name, file.stored_name
        )),
        Err(ContactError::MalformedDocument(_)) => {
            Outcome::failed("File is not valid XML. The file was deleted.")
        }
        Err(e @ ContactError::Validation { .. }) => Outcome::failed(e.to_string()),
        Err(e) => {
            error!("event=xml_upload module=ops status=error error={}", e);
            Outcome::failed(format!("Error uploading the file: {}", e))
        }
    }
}

/// All catalog files with their contacts; empty when the directory cannot
/// be read.
pub fn list_files(catalog: &FileCatalog) -> Vec<XmlFileListing> {
    catalog.list_with_contacts().unwrap_or_else(|e| {
        error!(
            "event=xml_list module=ops status=error dir={} error={}",
            catalog.dir().display(),
            e
        );
        Vec::new()
    })
}

pub fn view_file(catalog: &FileCatalog, filename: &str) -> Result<Vec<PartialContact>, Outcome> {
    catalog.view(filename).map_err(|e| match e {
        ContactError::NotFound { .. } => Outcome::failed("File not found"),
        ContactError::MalformedDocument(_) => Outcome::failed("File is not valid XML"),
        other => Outcome::failed(format!("Error reading the file: {}", other)),
    })
}

pub fn download_file(catalog: &FileCatalog, filename: &str) -> Result<XmlDownload, Outcome> {
    catalog.download(filename).map_err(|e| match e {
        ContactError::NotFound { .. } => Outcome::failed("File not found"),
        ContactError::Validation { .. } => Outcome::failed("File is not XML"),
        other => {
            error!(
                "event=xml_download module=ops status=error file={} error={}",
                filename, other
            );
            Outcome::failed(format!("Error downloading the file: {}", other))
        }
    })
}
