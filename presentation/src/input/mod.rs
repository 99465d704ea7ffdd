//! Terminal input adapters

mod line_input;

pub use line_input::{LineInput, StdinPromptInput};
