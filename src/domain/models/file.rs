use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A media asset attached to a project, product or brand profile.
///
/// The bytes travel with the value only in memory. A file whose
/// `binary_content` is `None` is a lean reference; the bytes for it live in
/// the media store under the same `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "name")]
    pub name: String,
    #[serde(
        rename = "binaryContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub binary_content: Option<Vec<u8>>,
    #[serde(
        rename = "encodedContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub encoded_content: Option<String>,
}

impl UploadedFile {
    /// Creates a hydrated file with a fresh random id.
    pub fn new(content: Vec<u8>, name: String, mime_type: String) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), content, name, mime_type)
    }

    pub fn with_id(id: String, content: Vec<u8>, name: String, mime_type: String) -> Self {
        Self {
            id,
            mime_type,
            name,
            binary_content: Some(content),
            encoded_content: None,
        }
    }

    pub fn is_hydrated(&self) -> bool {
        self.binary_content.is_some()
    }

    pub fn is_lean(&self) -> bool {
        self.binary_content.is_none()
    }

    pub fn size(&self) -> u64 {
        self.binary_content
            .as_ref()
            .map(|content| content.len() as u64)
            .unwrap_or(0)
    }

    /// Fills `encoded_content` with the base64 form of the bytes, as the
    /// generation service expects. Lean files are left untouched.
    pub fn encode_content(&mut self) -> Option<&str> {
        let content = self.binary_content.as_ref()?;
        self.encoded_content = Some(STANDARD.encode(content));
        self.encoded_content.as_deref()
    }
}
