//! Scoped acquisition of clients and sessions.
//!
//! Async cleanup cannot run from `Drop`, so the recipes wrap their bodies
//! in these helpers instead: the release step runs after the body no matter
//! how it finished, and a failing release is logged rather than masking the
//! body's own result.

use crate::ports::assistant_client::{AssistantClient, AssistantSession};
use crate::use_cases::error::RecipeError;
use std::future::Future;
use tracing::{debug, info, warn};

/// Start `client`, run `body`, then stop the client.
///
/// A start failure is returned as [`RecipeError::Startup`] without running
/// the body. A stop failure is logged and does not change the result.
pub async fn with_client<C, T, F, Fut>(client: &C, body: F) -> Result<T, RecipeError>
where
    C: AssistantClient + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, RecipeError>>,
{
    client.start().await.map_err(RecipeError::Startup)?;
    info!("Client started");

    let result = body().await;

    match client.stop().await {
        Ok(()) => info!("Client stopped"),
        Err(e) => warn!("Error stopping client: {}", e),
    }

    result
}

/// Run `body`, then destroy `session`.
pub async fn with_session<T, F, Fut>(
    session: &dyn AssistantSession,
    body: F,
) -> Result<T, RecipeError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, RecipeError>>,
{
    let result = body().await;
    release_session(session).await;
    result
}

/// Destroy a session, logging instead of failing.
pub async fn release_session(session: &dyn AssistantSession) {
    match session.destroy().await {
        Ok(()) => debug!("Session {} destroyed", session.session_id()),
        Err(e) => warn!("Error destroying session {}: {}", session.session_id(), e),
    }
}
