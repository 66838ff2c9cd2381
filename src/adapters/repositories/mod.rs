mod sqlite_media_store;
mod sqlite_record_store;
pub(crate) mod sqlite_statements;
mod sqlite_unit_of_work;

pub use sqlite_media_store::SqliteMediaStore;
pub use sqlite_record_store::SqliteRecordStore;
pub use sqlite_unit_of_work::SqliteUnitOfWork;
