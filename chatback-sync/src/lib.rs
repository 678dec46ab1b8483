//! Synchronization and rendering adapter for the Chatback hosted comment
//! service: pulls new comments into a local SQLite store and renders the
//! cached, approved ones as embeddable HTML fragments.

pub mod api;
pub mod config;
pub mod db;
pub mod encoding;
pub mod models;
pub mod render;
pub mod sync;

pub use db::Database;
pub use encoding::StorageEncoding;
pub use sync::ChatbackSync;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
