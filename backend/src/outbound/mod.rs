//! Driven adapters behind the domain ports.

mod memory;
pub mod persistence;

pub use memory::InMemoryProfileStore;
