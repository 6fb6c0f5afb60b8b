//! Statement builder module

pub mod common;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

// Re-export types from submodules
pub use delete::{DeleteBuilderComplete, DeleteBuilderInitial};
pub use insert::{InsertBuilderComplete, InsertBuilderInitial, InsertSource};
pub use select::SelectBuilder;
pub use update::{UpdateBuilderComplete, UpdateBuilderInitial, UpdateBuilderWithSet};
