mod repo_tx;
mod task_repo;
mod token_registry;
mod user_repo;

pub use repo_tx::*;
pub use task_repo::*;
pub use token_registry::*;
pub use user_repo::*;
