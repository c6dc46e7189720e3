//! Persistent QR-text to anchor mappings.

mod store;
mod types;

pub use store::{MappingError, MappingStore};
pub use types::{MappingEntry, MappingList};
