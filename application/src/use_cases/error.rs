//! Errors shared by all recipe use cases

use crate::ports::assistant_client::ClientError;
use crate::ports::prompt_input::InputError;
use recipes_domain::DomainError;
use thiserror::Error;

/// Errors that can end a recipe
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Failed to start client: {0}")]
    Startup(#[source] ClientError),

    #[error("Failed to acquire session: {0}")]
    SessionUnavailable(#[source] ClientError),

    #[error("Failed to send message: {0}")]
    SendFailed(#[source] ClientError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error(transparent)]
    InvalidRepo(#[from] DomainError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),
}

impl RecipeError {
    /// Startup and session acquisition failures terminate the recipe;
    /// everything else is reported at the call site and may be survived.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RecipeError::Startup(_) | RecipeError::SessionUnavailable(_) | RecipeError::InvalidRepo(_)
        )
    }
}
