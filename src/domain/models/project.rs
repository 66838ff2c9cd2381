use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::models::file::UploadedFile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "uploadedFile", default)]
    pub primary_asset: Option<UploadedFile>,
    #[serde(rename = "generatedImages", default)]
    pub generated_images: Vec<UploadedFile>,
    #[serde(rename = "generatedVideos", default)]
    pub generated_videos: Vec<UploadedFile>,
    #[serde(rename = "referenceFiles", default)]
    pub reference_files: Vec<UploadedFile>,
    #[serde(rename = "startFrame", default)]
    pub start_frame: Option<UploadedFile>,
    #[serde(rename = "endFrame", default)]
    pub end_frame: Option<UploadedFile>,
    /// Prompt text, model selections, campaign data. Stored as-is.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Project {
    pub fn new(id: String, user_id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            created_at,
            primary_asset: None,
            generated_images: Vec::new(),
            generated_videos: Vec::new(),
            reference_files: Vec::new(),
            start_frame: None,
            end_frame: None,
            metadata: Map::new(),
        }
    }
}
