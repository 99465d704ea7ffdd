//! Interactive loop vocabulary.

/// Keywords that end an interactive recipe loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCommand {
    Exit,
    Quit,
}

impl ExitCommand {
    /// Parse a line typed by the user (case-insensitive, surrounding
    /// whitespace ignored).
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("exit") {
            Some(ExitCommand::Exit)
        } else if input.eq_ignore_ascii_case("quit") {
            Some(ExitCommand::Quit)
        } else {
            None
        }
    }
}

/// Returns true if the line asks to leave the loop.
pub fn is_exit_command(input: &str) -> bool {
    ExitCommand::parse(input).is_some()
}
