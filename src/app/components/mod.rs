//! Shared UI components for the console.

pub mod layout;
pub mod modal;
pub mod nav;
pub mod resource_form;

pub use layout::Layout;
pub use modal::Modal;
pub use nav::Nav;
pub use resource_form::{FieldEntry, ResourceForm};
