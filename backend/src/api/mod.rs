pub mod auth;
mod catchers;
pub mod search;

pub use auth::*;
pub use catchers::*;
pub use search::*;
