pub mod database;
pub mod dto;
pub mod error;
pub mod repositories;
