//! Submit -> poll -> resolve loop for one synthesis job.
//!
//! The workflow holds no lock of its own. Callers run one generation at
//! a time.

use std::sync::Arc;
use std::time::Duration;

use p2f_core::request::GenerationRequest;
use p2f_veo::credentials::CredentialGate;
use p2f_veo::messages::Operation;
use p2f_veo::synthesis::{SynthesisApi, SynthesisJob};
use p2f_veo::ENTITY_NOT_FOUND_MARKER;
use tokio_util::sync::CancellationToken;

use crate::error::GenerationError;
use crate::progress::{
    cadence_messages, ProgressSink, MSG_FINALIZED, MSG_INITIALIZING, MSG_RENDERING,
    MSG_TRANSMITTING,
};

/// Default delay between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Query parameter carrying the credential on signed media URIs.
pub const MEDIA_KEY_PARAM: &str = "key";

/// Tunable parameters for the polling loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Wait between consecutive status queries.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Runs synthesis jobs against a [`SynthesisApi`].
pub struct GenerationWorkflow {
    api: Arc<dyn SynthesisApi>,
    gate: CredentialGate,
    config: PollConfig,
}

impl GenerationWorkflow {
    pub fn new(api: Arc<dyn SynthesisApi>, gate: CredentialGate, config: PollConfig) -> Self {
        Self { api, gate, config }
    }

    pub fn gate(&self) -> &CredentialGate {
        &self.gate
    }

    /// Generate one video and return its signed media URI.
    ///
    /// A credential failure at any stage opens the credential host's
    /// provisioning flow before the error is returned. Polling has no
    /// overall timeout; it ends when the operation is done, a query
    /// fails, or `cancel` fires. Cancellation only stops observing the
    /// job; the remote service is not told.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<String, GenerationError> {
        progress.report(MSG_INITIALIZING);

        let result = match self.gate.credential().await {
            Some(credential) => self.run(request, &credential, progress, cancel).await,
            None => Err(GenerationError::MissingCredential),
        };

        if let Err(e) = &result {
            tracing::error!(error = %e, "Generation failed");
            if e.is_credential_error() {
                self.gate.request_credential().await;
            }
        }
        result
    }

    async fn run(
        &self,
        request: &GenerationRequest,
        credential: &str,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<String, GenerationError> {
        let job = SynthesisJob::from_request(request);
        tracing::debug!(directive = %job.directive, "Composed directive");

        progress.report(MSG_TRANSMITTING);
        let mut operation = self.api.submit(&job, credential).await?;
        tracing::info!(
            operation = %operation.name,
            aspect_ratio = %job.aspect_ratio,
            resolution = %job.resolution,
            "Synthesis job submitted",
        );

        progress.report(MSG_RENDERING);
        let mut polls = 0u32;
        while !operation.done {
            polls += 1;
            for message in cadence_messages(polls) {
                progress.report(message);
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(operation = %operation.name, polls, "Generation abandoned");
                    return Err(GenerationError::Cancelled);
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }

            operation = self.api.poll(&operation, credential).await?;
            tracing::debug!(operation = %operation.name, poll = polls, done = operation.done, "Polled");
        }

        progress.report(MSG_FINALIZED);
        tracing::info!(operation = %operation.name, polls, "Synthesis finished");
        let uri = resolve_uri(&operation)?;
        sign_uri(uri, credential)
    }
}

/// Extract the media URI from a finished operation.
fn resolve_uri(operation: &Operation) -> Result<&str, GenerationError> {
    if let Some(err) = &operation.error {
        if err.message.contains(ENTITY_NOT_FOUND_MARKER) {
            return Err(GenerationError::CredentialRejected);
        }
        return Err(GenerationError::RemoteFailure(err.message.clone()));
    }
    operation.video_uri().ok_or(GenerationError::EmptyResult)
}

/// Append the credential to `uri` so the media endpoint authorizes the
/// download.
pub fn sign_uri(uri: &str, credential: &str) -> Result<String, GenerationError> {
    let mut url = url::Url::parse(uri).map_err(|e| GenerationError::InvalidMediaUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut().append_pair(MEDIA_KEY_PARAM, credential);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_appends_to_existing_query() {
        let signed = sign_uri("https://media.example/files/abc:download?alt=media", "k1").unwrap();
        assert_eq!(signed, "https://media.example/files/abc:download?alt=media&key=k1");
    }

    #[test]
    fn sign_adds_query_when_absent() {
        let signed = sign_uri("https://media.example/v.mp4", "k1").unwrap();
        assert_eq!(signed, "https://media.example/v.mp4?key=k1");
    }

    #[test]
    fn sign_rejects_relative_uri() {
        assert!(matches!(
            sign_uri("files/abc", "k1"),
            Err(GenerationError::InvalidMediaUri { .. })
        ));
    }

    #[test]
    fn failed_operation_with_marker_is_credential_error() {
        let mut op = Operation::pending("op");
        op.done = true;
        op.error = Some(p2f_veo::messages::OperationError {
            code: Some(5),
            message: "Requested entity was not found.".into(),
        });
        assert!(matches!(
            resolve_uri(&op),
            Err(GenerationError::CredentialRejected)
        ));
    }

    #[test]
    fn done_without_video_is_empty_result() {
        let mut op = Operation::pending("op");
        op.done = true;
        assert!(matches!(resolve_uri(&op), Err(GenerationError::EmptyResult)));
    }
}
