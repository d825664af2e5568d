//! Database models and schema initialization

pub mod init;
pub mod models;

pub use init::init_database;
pub use models::*;
