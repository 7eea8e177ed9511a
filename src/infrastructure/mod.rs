//! Infrastructure layer

pub mod storage;

pub use storage::InMemoryRepositoryProvider;
