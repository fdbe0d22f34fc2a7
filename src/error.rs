use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Error)]
/// `Exchange::acquire_timeout` error.
pub enum WaitError {
    /// No buffer was dispatched before the timeout elapsed.
    #[error("timed out waiting for a pending buffer")]
    TimedOut,
    /// Exchange is stopped, reader should exit.
    #[error("exchange is stopped")]
    Stopped,
}
