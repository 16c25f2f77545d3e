use std::time::Duration;

use crate::args::BackendProcessArgs;
use crate::error::BackendError;

///
/// BackendProcessManager
///
/// The asynchronous interface a supervisor implements to own the lifecycle
/// of one backend process. Native `async fn` in a trait, not `async-trait`: nothing in the
/// surrounding workspace pulls in an async runtime, so this crate doesn't
/// introduce one just to name this contract.
///
/// No implementation lives in this crate; this
/// trait, `Backoff`, and `BackendProcessArgs` are the whole of C11.
///

pub trait BackendProcessManager {
    /// Launch the backend process with the given arguments. Returns once the
    /// process has been spawned, not once it is ready to serve.
    async fn start(&mut self, args: &BackendProcessArgs) -> Result<(), BackendError>;

    /// Block until the process reports readiness or `deadline` elapses.
    async fn wait_ready(&mut self, deadline: Duration) -> Result<(), BackendError>;

    /// Request a graceful shutdown, falling back to a forceful one if the
    /// process hasn't exited by the time the caller gives up waiting.
    async fn shutdown(&mut self, grace_period: Duration) -> Result<(), BackendError>;

    /// The OS process id of the running backend, if one is currently up.
    fn pid(&self) -> Option<u32>;
}
