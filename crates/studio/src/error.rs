use p2f_core::error::CoreError;
use p2f_library::LibraryError;
use p2f_pipeline::GenerationError;

/// Errors returned by [`crate::Studio`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The credential gate is closed; provision a credential first.
    #[error("An API credential is required before generating")]
    CredentialRequired,

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Library(#[from] LibraryError),
}
