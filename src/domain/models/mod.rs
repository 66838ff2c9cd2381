pub mod file;
pub mod library;
pub mod project;
