//! Service implementations
//!
//! Real implementations of the persistence trait. The file backend is the
//! production store; the memory backend serves ephemeral runs and tests.

pub mod file_backend;
pub mod memory_backend;

pub use file_backend::FileBackend;
pub use memory_backend::MemoryBackend;
