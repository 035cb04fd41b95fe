//! In-memory storage backend, selected with `storage.backend = "memory"`.
//! Minimal implementations for local runs and tests; extend when needed.

mod repo_tx_memory;
mod task_repo_memory;
mod token_registry_memory;
mod user_repo_memory;

pub use repo_tx_memory::*;
pub use task_repo_memory::*;
pub use token_registry_memory::*;
pub use user_repo_memory::*;
