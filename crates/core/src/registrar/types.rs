//! Types for the registrar module.

use serde::{Deserialize, Serialize};

/// Metadata record persisted for every uploaded file.
///
/// Field names match the columns of the files table, including the
/// lowercase `createdby`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Original file name.
    pub filename: String,
    /// Durable reference returned by the storage transport.
    pub url: String,
    /// Declared MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Who staged the file.
    #[serde(rename = "createdby")]
    pub created_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_field_names() {
        let record = FileRecord {
            filename: "a.pdf".to_string(),
            url: "https://storage.example.com/files/1_a.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            created_by: "currentUser".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["filename"], "a.pdf");
        assert_eq!(json["type"], "application/pdf");
        assert_eq!(json["createdby"], "currentUser");
        assert!(json.get("mime_type").is_none());
    }
}
