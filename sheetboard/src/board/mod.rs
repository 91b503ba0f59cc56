//! Completion statistics for the dashboard
//!
//! - `aggregate`: counting over one sheet's rows
//! - `view`: sidebar overview and selected-sheet detail assembly
//! - `pass`: a full fetch-and-aggregate pass producing a [`Board`](crate::models::Board)

pub mod aggregate;
pub mod pass;
pub mod view;

pub use pass::render_pass;
