#![warn(clippy::uninlined_format_args)]

pub mod json_store;
pub mod memory_store;

pub use json_store::JsonRecordStore;
pub use memory_store::InMemoryRecordStore;
