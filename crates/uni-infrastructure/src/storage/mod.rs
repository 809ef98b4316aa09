//! Key-value storage implementations.

mod atomic_file;
mod file_lock;
mod json_file_store;
mod memory_store;

pub use atomic_file::write_atomically;
pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
