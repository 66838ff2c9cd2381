use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::{
    application::{
        error::ApplicationError,
        repositories::{
            media_store::MediaStore,
            record_store::{Collection, RecordStore, StoredRecord},
            unit_of_work::{UnitOfWork, WriteBatch},
        },
        services::media_translator::{
            collect_content, make_lean, referenced_ids, rehydrate, MediaFields,
        },
    },
    domain::models::{
        library::{BrandProfile, SavedProduct},
        project::Project,
    },
};

/// A record kind the service knows how to store.
pub trait PersistedRecord: MediaFields + Serialize + DeserializeOwned {
    const COLLECTION: Collection;
    /// Serialized names of the typed fields. The flattened metadata map must
    /// not use any of them.
    const FIELDS: &'static [&'static str];

    fn key(&self) -> &str;
    fn owner_id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn metadata(&self) -> &Map<String, Value>;
}

impl PersistedRecord for Project {
    const COLLECTION: Collection = Collection::Projects;
    const FIELDS: &'static [&'static str] = &[
        "id",
        "userId",
        "createdAt",
        "uploadedFile",
        "generatedImages",
        "generatedVideos",
        "referenceFiles",
        "startFrame",
        "endFrame",
    ];

    fn key(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

impl PersistedRecord for SavedProduct {
    const COLLECTION: Collection = Collection::SavedProducts;
    const FIELDS: &'static [&'static str] = &["id", "userId", "createdAt", "name", "image"];

    fn key(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

impl PersistedRecord for BrandProfile {
    const COLLECTION: Collection = Collection::BrandProfiles;
    const FIELDS: &'static [&'static str] = &["userId", "updatedAt", "logo"];

    fn key(&self) -> &str {
        &self.user_id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

fn encode<T: PersistedRecord>(lean: &T) -> Result<StoredRecord, ApplicationError> {
    // A flattened key with a field's name would replace that field in the
    // document, bytes included.
    if let Some(reserved) = lean
        .metadata()
        .keys()
        .find(|key| T::FIELDS.contains(&key.as_str()))
    {
        return Err(ApplicationError::Serialization(format!(
            "Metadata key '{}' collides with a {} field",
            reserved,
            T::COLLECTION.table_name()
        )));
    }

    Ok(StoredRecord {
        key: lean.key().to_string(),
        owner_id: lean.owner_id().to_string(),
        created_at: lean.created_at(),
        file_ids: referenced_ids(lean).into_iter().collect(),
        document: serde_json::to_value(lean)?,
    })
}

fn decode<T: PersistedRecord>(record: StoredRecord) -> Result<T, ApplicationError> {
    Ok(serde_json::from_value(record.document)?)
}

/// Save, list and delete for projects, saved products and brand profiles.
///
/// Records are written lean together with their media in one transaction and
/// come back hydrated. Concurrent saves of the same key are last-write-wins.
#[derive(Clone)]
pub struct PersistenceService {
    media_store: Arc<dyn MediaStore>,
    record_store: Arc<dyn RecordStore>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl PersistenceService {
    pub fn new(
        media_store: Arc<dyn MediaStore>,
        record_store: Arc<dyn RecordStore>,
        unit_of_work: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            media_store,
            record_store,
            unit_of_work,
        }
    }

    /// Stores the project lean with its media. Blobs an earlier version
    /// referenced and this one does not are removed in the same commit.
    pub async fn save_project(&self, project: &Project) -> Result<(), ApplicationError> {
        self.save(project).await
    }

    /// The user's projects, most recent first.
    pub async fn get_projects_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Project>, ApplicationError> {
        self.list_for_owner(user_id).await
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Option<Project>, ApplicationError> {
        self.get_one(project_id).await
    }

    /// Removes the project and every blob it references. Unknown ids succeed.
    pub async fn delete_project(&self, project_id: &str) -> Result<(), ApplicationError> {
        self.delete::<Project>(project_id).await
    }

    pub async fn save_product_to_library(
        &self,
        product: &SavedProduct,
    ) -> Result<(), ApplicationError> {
        self.save(product).await
    }

    pub async fn get_saved_products_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<SavedProduct>, ApplicationError> {
        self.list_for_owner(user_id).await
    }

    pub async fn delete_product_from_library(
        &self,
        product_id: &str,
    ) -> Result<(), ApplicationError> {
        self.delete::<SavedProduct>(product_id).await
    }

    pub async fn save_brand_profile(&self, profile: &BrandProfile) -> Result<(), ApplicationError> {
        self.save(profile).await
    }

    pub async fn get_brand_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<BrandProfile>, ApplicationError> {
        self.get_one(user_id).await
    }

    pub async fn delete_brand_profile(&self, user_id: &str) -> Result<(), ApplicationError> {
        self.delete::<BrandProfile>(user_id).await
    }

    async fn save<T: PersistedRecord>(&self, record: &T) -> Result<(), ApplicationError> {
        let content = collect_content(record);
        let stored = encode(&make_lean(record))?;
        let media_count = content.len();

        let mut batch = WriteBatch::new();
        for (file_id, bytes) in content {
            batch.put_media(file_id, bytes);
        }
        batch.put_record(T::COLLECTION, stored);

        self.unit_of_work.commit(batch).await.map_err(|e| {
            error!(
                "Could not save {} {}: {}",
                T::COLLECTION.table_name(),
                record.key(),
                e
            );
            e
        })?;

        info!(
            "Saved {} {} with {} media",
            T::COLLECTION.table_name(),
            record.key(),
            media_count
        );
        Ok(())
    }

    async fn list_for_owner<T: PersistedRecord>(
        &self,
        owner_id: &str,
    ) -> Result<Vec<T>, ApplicationError> {
        let records = self.record_store.get_all(T::COLLECTION).await?;

        let lean: Vec<T> = records
            .into_iter()
            .filter(|record| record.owner_id == owner_id)
            .filter_map(|record| {
                let key = record.key.clone();
                match decode::<T>(record) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        warn!(
                            "Skipping unreadable {} record {}: {}",
                            T::COLLECTION.table_name(),
                            key,
                            e
                        );
                        None
                    }
                }
            })
            .collect();

        let media_store = self.media_store.as_ref();
        let mut hydrated = join_all(lean.iter().map(|value| rehydrate(value, media_store))).await;
        hydrated.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        debug!(
            "Loaded {} {} for owner {}",
            hydrated.len(),
            T::COLLECTION.table_name(),
            owner_id
        );
        Ok(hydrated)
    }

    async fn get_one<T: PersistedRecord>(&self, key: &str) -> Result<Option<T>, ApplicationError> {
        let Some(record) = self.record_store.get(T::COLLECTION, key).await? else {
            return Ok(None);
        };
        let lean: T = decode(record)?;
        Ok(Some(rehydrate(&lean, self.media_store.as_ref()).await))
    }

    async fn delete<T: PersistedRecord>(&self, key: &str) -> Result<(), ApplicationError> {
        // The record's media ids are read inside the commit, so a concurrent
        // save cannot slip new blobs past the cascade.
        let mut batch = WriteBatch::new();
        batch.delete_record(T::COLLECTION, key);

        self.unit_of_work.commit(batch).await.map_err(|e| {
            error!(
                "Could not delete {} {}: {}",
                T::COLLECTION.table_name(),
                key,
                e
            );
            e
        })?;

        info!("Deleted {} {}", T::COLLECTION.table_name(), key);
        Ok(())
    }
}
