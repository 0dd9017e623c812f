//! Application data model
//!
//! [`schema`] is the registry consumed by startup schema synchronization.

pub mod note;
pub mod pagination;
pub mod validation;

use dbscope_core::Schema;

pub use note::{Note, NoteTitle};
pub use pagination::{Page, PageQuery, PageWindow};
pub use validation::ValidationError;

/// Every table the service needs, in creation order
pub fn schema() -> Schema {
    Schema::new().register::<Note>()
}
