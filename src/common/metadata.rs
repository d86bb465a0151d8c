/// Flattened document metadata.
///
/// A plain summary of the most common core and extended properties, for
/// callers that want one struct instead of the typed property handles in
/// [`crate::ooxml::metadata`].
use crate::common::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document author/creator
    pub author: Option<String>,
    /// Keywords associated with the document
    pub keywords: Option<String>,
    /// Document description
    pub description: Option<String>,
    /// Last person to modify the document
    pub last_modified_by: Option<String>,
    /// Revision number
    pub revision: Option<String>,
    /// Creation date
    pub created: Option<DateTime<Utc>>,
    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
    /// Document category
    pub category: Option<String>,
    /// Content status (draft, final, etc.)
    pub content_status: Option<String>,
    /// Application that created the document
    pub application: Option<String>,
    /// Company/organization
    pub company: Option<String>,
    /// Number of slides recorded by the producing application
    pub slide_count: Option<u32>,
    /// Number of notes pages recorded by the producing application
    pub note_count: Option<u32>,
    /// Number of words
    pub word_count: Option<u32>,
}

impl Metadata {
    /// Whether any field is populated.
    pub fn has_data(&self) -> bool {
        *self != Self::default()
    }

    /// Render as a YAML front matter block, or an empty string when there is
    /// nothing to render.
    pub fn to_yaml_front_matter(&self) -> Result<String> {
        if !self.has_data() {
            return Ok(String::new());
        }

        let yaml = serde_saphyr::to_string(self).map_err(|e| {
            crate::common::Error::Other(format!("Failed to serialize metadata to YAML: {}", e))
        })?;

        Ok(format!("---\n{}---\n\n", yaml))
    }
}
