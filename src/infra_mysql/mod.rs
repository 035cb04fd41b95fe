mod task_repo_mysql;
mod token_registry_mysql;
mod user_repo_mysql;

pub use task_repo_mysql::*;
pub use token_registry_mysql::*;
pub use user_repo_mysql::*;

mod repo_tx_mysql;

pub use repo_tx_mysql::*;

mod util;
