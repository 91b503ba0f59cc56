//! Command-line arguments for sheetboard.

mod args;

pub use args::{CliArgs, VERSION};
