use p2f_veo::api::VeoApiError;

/// Errors that end a generation attempt. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The service rejected the credential ("entity not found").
    #[error("Requested entity was not found. This usually means a paid API key from a billable GCP project is required for Veo 3.1.")]
    CredentialRejected,

    /// No credential was available to authorize the job.
    #[error("No API credential is available. Select a key or set API_KEY.")]
    MissingCredential,

    /// The operation finished without a usable media reference.
    #[error("Synthesis failed to produce data stream.")]
    EmptyResult,

    /// The operation finished with an error status.
    #[error("Synthesis failed: {0}")]
    RemoteFailure(String),

    /// The media reference could not be parsed as a URI.
    #[error("Invalid media URI '{uri}': {reason}")]
    InvalidMediaUri { uri: String, reason: String },

    /// The caller stopped observing the job.
    #[error("Generation cancelled")]
    Cancelled,

    /// Submission or polling failed for any other reason.
    #[error(transparent)]
    Api(VeoApiError),
}

impl GenerationError {
    /// Whether the failure means the credential must be re-provisioned.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Self::CredentialRejected | Self::MissingCredential)
    }
}

impl From<VeoApiError> for GenerationError {
    fn from(e: VeoApiError) -> Self {
        if e.is_entity_not_found() {
            Self::CredentialRejected
        } else {
            Self::Api(e)
        }
    }
}
