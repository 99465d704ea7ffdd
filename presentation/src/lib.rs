//! Presentation layer for copilot-recipes
//!
//! This crate contains the CLI definitions of the recipe binaries, console
//! progress output, and terminal input.

pub mod cli;
pub mod input;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{
    ErrorHandlingCli, ManagingLocalFilesCli, MultipleSessionsCli, PersistingSessionsCli,
    PrVisualizationCli,
};
pub use input::{LineInput, StdinPromptInput};
pub use progress::{ConsoleProgress, Recipe};
