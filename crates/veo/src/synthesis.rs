//! The seam between the generation workflow and the remote service.
//!
//! [`SynthesisApi`] is implemented by [`crate::api::VeoApi`] in
//! production and by scripted mocks in tests.

use async_trait::async_trait;
use p2f_core::request::{AspectRatio, GenerationRequest, Resolution};

use crate::api::VeoApiError;
use crate::messages::Operation;

/// Number of videos requested per job.
pub const VIDEOS_PER_JOB: u32 = 1;

/// One synthesis job as submitted to the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisJob {
    pub directive: String,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    pub video_count: u32,
}

impl SynthesisJob {
    /// Build the job for a request, composing its directive.
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            directive: request.directive(),
            aspect_ratio: request.aspect_ratio(),
            resolution: request.resolution(),
            video_count: VIDEOS_PER_JOB,
        }
    }
}

/// A long-running video synthesis service.
#[async_trait]
pub trait SynthesisApi: Send + Sync {
    /// Submit a job. The returned operation is usually not yet done.
    async fn submit(&self, job: &SynthesisJob, credential: &str)
        -> Result<Operation, VeoApiError>;

    /// Re-query the status of a previously submitted operation.
    async fn poll(&self, operation: &Operation, credential: &str)
        -> Result<Operation, VeoApiError>;
}
