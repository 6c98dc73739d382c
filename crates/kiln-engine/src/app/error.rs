use super::AppPhase;

/// Fatal application errors.
///
/// Everything else (hook errors during a frame, shader problems, swap
/// failures) is logged and the loop keeps going.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("application is not initialized")]
    NotInitialized,
    #[error("application is already initialized")]
    AlreadyInitialized,
    #[error("application cannot run from phase {0:?}")]
    InvalidPhase(AppPhase),
    #[error("window surface is not available")]
    WindowUnavailable,
    #[error("on_create failed: {0:#}")]
    Create(anyhow::Error),
    #[error("failed to set up desktop window: {0:#}")]
    Desktop(anyhow::Error),
}
