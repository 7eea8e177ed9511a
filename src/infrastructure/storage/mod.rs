//! Storage implementations for the domain repositories

pub mod memory;

pub use memory::{
    default_templates, InMemoryLotPricingRepository, InMemoryRepositoryProvider,
    InMemoryTemplateRepository,
};
