mod auth_service;
mod task_service;

pub use auth_service::*;
pub use task_service::*;
