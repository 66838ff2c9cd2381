//! Lean/hydrate translation.
//!
//! Records are persisted lean: every embedded [`UploadedFile`] has its bytes
//! removed and the bytes go to the [`MediaStore`] under the file id. Reading a
//! record back reattaches whatever bytes the media store still holds. This is
//! the only module that knows which fields of a record carry files.

use std::collections::{BTreeMap, BTreeSet};

use futures::future::join_all;
use tracing::{debug, warn};

use crate::{
    application::repositories::media_store::MediaStore,
    domain::models::{
        file::UploadedFile,
        library::{BrandProfile, SavedProduct},
        project::Project,
    },
};

/// Enumerates the file-valued fields of a record. Absent optional files are
/// skipped; list fields yield their entries in order.
pub trait MediaFields: Clone + Send + Sync {
    fn media(&self) -> Vec<&UploadedFile>;
    fn media_mut(&mut self) -> Vec<&mut UploadedFile>;
}

impl MediaFields for Project {
    fn media(&self) -> Vec<&UploadedFile> {
        let mut files = Vec::new();
        files.extend(self.primary_asset.as_ref());
        files.extend(self.generated_images.iter());
        files.extend(self.generated_videos.iter());
        files.extend(self.reference_files.iter());
        files.extend(self.start_frame.as_ref());
        files.extend(self.end_frame.as_ref());
        files
    }

    fn media_mut(&mut self) -> Vec<&mut UploadedFile> {
        let mut files = Vec::new();
        files.extend(self.primary_asset.as_mut());
        files.extend(self.generated_images.iter_mut());
        files.extend(self.generated_videos.iter_mut());
        files.extend(self.reference_files.iter_mut());
        files.extend(self.start_frame.as_mut());
        files.extend(self.end_frame.as_mut());
        files
    }
}

impl MediaFields for SavedProduct {
    fn media(&self) -> Vec<&UploadedFile> {
        self.image.iter().collect()
    }

    fn media_mut(&mut self) -> Vec<&mut UploadedFile> {
        self.image.iter_mut().collect()
    }
}

impl MediaFields for BrandProfile {
    fn media(&self) -> Vec<&UploadedFile> {
        self.logo.iter().collect()
    }

    fn media_mut(&mut self) -> Vec<&mut UploadedFile> {
        self.logo.iter_mut().collect()
    }
}

/// Copy of `file` without `binary_content` or `encoded_content`.
pub fn strip(file: Option<&UploadedFile>) -> Option<UploadedFile> {
    file.map(|file| UploadedFile {
        id: file.id.clone(),
        mime_type: file.mime_type.clone(),
        name: file.name.clone(),
        binary_content: None,
        encoded_content: None,
    })
}

/// Lean copy of `record`. The caller's value keeps its bytes.
pub fn make_lean<T: MediaFields>(record: &T) -> T {
    let mut lean = record.clone();
    for file in lean.media_mut() {
        file.binary_content = None;
        file.encoded_content = None;
    }
    lean
}

/// Bytes to persist for `record`, keyed by file id. When two fields share an
/// id the later field wins.
pub fn collect_content<T: MediaFields>(record: &T) -> BTreeMap<String, Vec<u8>> {
    record
        .media()
        .into_iter()
        .filter_map(|file| {
            file.binary_content
                .as_ref()
                .map(|content| (file.id.clone(), content.clone()))
        })
        .collect()
}

/// Every distinct file id referenced by `record`.
pub fn referenced_ids<T: MediaFields>(record: &T) -> BTreeSet<String> {
    record
        .media()
        .into_iter()
        .map(|file| file.id.clone())
        .collect()
}

async fn fetch_content(file_id: &str, media_store: &dyn MediaStore) -> Option<Vec<u8>> {
    match media_store.get(file_id).await {
        Ok(Some(content)) => Some(content),
        Ok(None) => {
            debug!("No stored content for file {}, returning it lean", file_id);
            None
        }
        Err(e) => {
            warn!(
                "Failed to load content for file {}, returning it lean: {}",
                file_id, e
            );
            None
        }
    }
}

/// Reattaches the stored bytes to a single file. A missing blob or a failed
/// lookup leaves the file as it was.
pub async fn rehydrate_one(
    file: Option<&UploadedFile>,
    media_store: &dyn MediaStore,
) -> Option<UploadedFile> {
    let file = file?;
    let mut hydrated = file.clone();
    if let Some(content) = fetch_content(&file.id, media_store).await {
        hydrated.binary_content = Some(content);
    }
    Some(hydrated)
}

/// Hydrated copy of `record`. Every file goes through [`rehydrate_one`] and
/// all lookups are issued at once.
pub async fn rehydrate<T: MediaFields>(record: &T, media_store: &dyn MediaStore) -> T {
    let files = join_all(
        record
            .media()
            .into_iter()
            .map(|file| rehydrate_one(Some(file), media_store)),
    )
    .await;

    let mut hydrated = record.clone();
    for (slot, file) in hydrated.media_mut().into_iter().zip(files) {
        if let Some(file) = file {
            *slot = file;
        }
    }
    hydrated
}
