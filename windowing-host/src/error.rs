use thiserror::Error;

/// Errors surfaced by [`crate::Controller`].
///
/// The core never fails; everything here is a host wiring problem.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum HostError {
    /// A callback the controller cannot work without was not provided.
    #[error("missing required host callback `{0}`")]
    MissingCallback(&'static str),
    /// The controller was torn down; it no longer observes or writes anything.
    #[error("controller has been torn down")]
    TornDown,
}
