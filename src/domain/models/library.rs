use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::models::file::UploadedFile;

/// A product the user keeps in their library for reuse across projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedProduct {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "name", default)]
    pub name: String,
    #[serde(rename = "image", default)]
    pub image: Option<UploadedFile>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// One per user, keyed by `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "logo", default)]
    pub logo: Option<UploadedFile>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}
