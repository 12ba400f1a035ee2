//! Database initialization and the settings table

pub mod init;
pub mod settings;

pub use init::{init_database, init_memory_database};
