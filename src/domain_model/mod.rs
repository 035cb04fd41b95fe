mod task;
mod token;
mod user;

pub use task::*;
pub use token::*;
pub use user::*;
