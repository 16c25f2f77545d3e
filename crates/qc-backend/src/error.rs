use thiserror::Error as ThisError;

///
/// BackendError
///
/// Failures the process manager contract can report.
/// A stable variant set rather than an opaque string, but narrow since this
/// crate never constructs one itself — implementing the supervisor body is
/// left to the embedder.
///

#[derive(Debug, ThisError)]
pub enum BackendError {
    #[error("backend did not report READY within the startup timeout")]
    StartTimeout,

    #[error("backend process exited unexpectedly (code {code:?}): {stderr_tail}")]
    ProcessExited {
        code: Option<i32>,
        stderr_tail: String,
    },

    #[error("lost connection to the backend process")]
    ConnectionLost,

    #[error("invalid backend process arguments: {0}")]
    InvalidArgs(String),
}
