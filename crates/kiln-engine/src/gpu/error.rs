use std::path::PathBuf;

/// Errors surfaced by [`super::ShaderProgram`] construction.
///
/// Stage compile failures are not errors: they are logged and the (broken)
/// stage is still linked, which then fails with [`ShaderError::Link`].
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader source {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("driver could not create {object} for {label}: {reason}")]
    Create {
        object: &'static str,
        label: String,
        reason: String,
    },
    #[error("failed to link shader program {label}: {log}")]
    Link { label: String, log: String },
}
