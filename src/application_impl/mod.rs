mod auth_service_impl;
mod task_service_impl;
mod token_codec;

pub use auth_service_impl::*;
pub use task_service_impl::*;
pub use token_codec::*;
