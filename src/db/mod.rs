//! Database layer (in-process store).

pub mod memory;

pub use memory::MemoryStore;

/// Unique column names as constants.
pub mod columns {
    pub const USERNAME: &str = "username";
    pub const EXTERNAL_ID: &str = "external_id";
}
