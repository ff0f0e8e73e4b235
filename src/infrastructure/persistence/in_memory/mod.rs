//! # In-Memory Repositories
//!
//! Thread-safe in-memory implementations of the repository ports.

pub mod margin_config_repository;
pub mod token_repository;

pub use margin_config_repository::InMemoryMarginConfigRepository;
pub use token_repository::InMemoryTokenRepository;
