//! Console progress reporting for the recipes

mod console;

pub use console::{ConsoleProgress, Recipe};
