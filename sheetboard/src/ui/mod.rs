//! UI module for sheetboard
//!
//! Rendering for the header, the sheet overview sidebar, and the detail
//! panel with its metric cards, status chart and task table.

mod chart;
mod helpers;
mod render;
mod sidebar;
mod stats;
mod table;

pub use render::draw;
