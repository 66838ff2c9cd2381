use async_trait::async_trait;

use crate::application::{
    error::ApplicationError,
    repositories::record_store::{Collection, StoredRecord},
};

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    PutMedia { file_id: String, content: Vec<u8> },
    /// Upserts the record. Media the previous version referenced and the new
    /// one does not is deleted.
    PutRecord { collection: Collection, record: StoredRecord },
    /// Deletes the record and every media id it references. A missing
    /// record is a no-op.
    DeleteRecord { collection: Collection, key: String },
}

/// Writes that must land together or not at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_media(&mut self, file_id: impl Into<String>, content: Vec<u8>) -> &mut Self {
        self.ops.push(WriteOp::PutMedia {
            file_id: file_id.into(),
            content,
        });
        self
    }

    pub fn put_record(&mut self, collection: Collection, record: StoredRecord) -> &mut Self {
        self.ops.push(WriteOp::PutRecord { collection, record });
        self
    }

    pub fn delete_record(&mut self, collection: Collection, key: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::DeleteRecord {
            collection,
            key: key.into(),
        });
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Applies every op of the batch in a single transaction. On error
    /// nothing from the batch is visible.
    async fn commit(&self, batch: WriteBatch) -> Result<(), ApplicationError>;
}
