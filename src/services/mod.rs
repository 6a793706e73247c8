//! Typed accessors for repositories, issues and their sub-collections.

mod comments;
mod events;
mod issues;
mod labels;
mod repositories;
mod users;

pub use comments::*;
pub use events::*;
pub use issues::*;
pub use labels::*;
pub use repositories::*;
pub use users::*;
