use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::application::error::ApplicationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Projects,
    SavedProducts,
    BrandProfiles,
}

impl Collection {
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::SavedProducts => "saved_products",
            Collection::BrandProfiles => "brand_profiles",
        }
    }
}

/// A lean document as it sits in a collection. `owner_id`, `created_at` and
/// `file_ids` are copied out of the document so the store can use them
/// without decoding it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub key: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    /// Every media id the document references, sorted and distinct.
    pub file_ids: Vec<String>,
    pub document: Value,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put(&self, collection: Collection, record: StoredRecord)
        -> Result<(), ApplicationError>;
    async fn get(
        &self,
        collection: Collection,
        key: &str,
    ) -> Result<Option<StoredRecord>, ApplicationError>;
    /// Every record in the collection, regardless of owner.
    async fn get_all(&self, collection: Collection) -> Result<Vec<StoredRecord>, ApplicationError>;
    async fn delete(&self, collection: Collection, key: &str) -> Result<(), ApplicationError>;
}
