pub mod media_translator;
pub mod persistence_service;

pub use persistence_service::PersistenceService;
