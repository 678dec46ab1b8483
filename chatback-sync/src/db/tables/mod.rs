//! Database model modules - extends Database with domain-specific methods
//!
//! Each module adds `impl Database` blocks with methods for a specific table group.

mod comments;   // comments
mod sync_state; // key_value (sync cursor, cron marker)
