pub mod media_store;
pub mod record_store;
pub mod unit_of_work;
