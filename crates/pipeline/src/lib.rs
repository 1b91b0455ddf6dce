//! Video generation workflow.
//!
//! Drives one synthesis job from submission to a signed media URI:
//! compose the directive, submit, poll until done, extract the video
//! URI and append the credential to it.

pub mod error;
pub mod progress;
pub mod workflow;

pub use error::GenerationError;
pub use progress::ProgressSink;
pub use workflow::{GenerationWorkflow, PollConfig};
