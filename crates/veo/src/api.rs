//! REST API client for the Veo long-running-operation endpoints.
//!
//! Wraps job submission (`predictLongRunning`) and operation status
//! retrieval using [`reqwest`]. The credential is sent per call in the
//! `x-goog-api-key` header.

use async_trait::async_trait;

use crate::messages::{Operation, PredictInstance, PredictParameters, PredictRequest};
use crate::synthesis::{SynthesisApi, SynthesisJob};
use crate::ENTITY_NOT_FOUND_MARKER;

/// Default base URL of the generative language REST API.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default video model.
pub const DEFAULT_MODEL: &str = "veo-3.1-fast-generate-preview";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for the Veo service.
pub struct VeoApi {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

/// Errors from the Veo REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum VeoApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Veo API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl VeoApiError {
    /// Whether the error carries the service's "entity not found"
    /// signature, which means the credential cannot be used.
    pub fn is_entity_not_found(&self) -> bool {
        self.to_string().contains(ENTITY_NOT_FOUND_MARKER)
    }
}

impl VeoApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base URL, e.g. [`DEFAULT_API_URL`].
    /// * `model`   - Model id, e.g. [`DEFAULT_MODEL`].
    pub fn new(api_url: String, model: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, model)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, model: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Submit a synthesis job.
    ///
    /// Sends `POST /models/{model}:predictLongRunning` and returns the
    /// operation object naming the queued job.
    pub async fn submit_job(
        &self,
        job: &SynthesisJob,
        credential: &str,
    ) -> Result<Operation, VeoApiError> {
        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: &job.directive,
            }],
            parameters: PredictParameters {
                aspect_ratio: job.aspect_ratio.as_str(),
                resolution: job.resolution.as_str(),
                sample_count: job.video_count,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:predictLongRunning",
                self.api_url, self.model
            ))
            .header(API_KEY_HEADER, credential)
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Retrieve the current state of an operation.
    ///
    /// Sends `GET /{operation_name}`.
    pub async fn get_operation(
        &self,
        operation_name: &str,
        credential: &str,
    ) -> Result<Operation, VeoApiError> {
        let response = self
            .client
            .get(format!("{}/{}", self.api_url, operation_name))
            .header(API_KEY_HEADER, credential)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`VeoApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, VeoApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(VeoApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, VeoApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl SynthesisApi for VeoApi {
    async fn submit(
        &self,
        job: &SynthesisJob,
        credential: &str,
    ) -> Result<Operation, VeoApiError> {
        self.submit_job(job, credential).await
    }

    async fn poll(
        &self,
        operation: &Operation,
        credential: &str,
    ) -> Result<Operation, VeoApiError> {
        self.get_operation(&operation.name, credential).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_body_is_detected() {
        let err = VeoApiError::ApiError {
            status: 404,
            body: r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#
                .to_string(),
        };
        assert!(err.is_entity_not_found());
    }

    #[test]
    fn other_api_errors_are_not_credential_errors() {
        let err = VeoApiError::ApiError {
            status: 429,
            body: "Resource has been exhausted".to_string(),
        };
        assert!(!err.is_entity_not_found());
        assert_eq!(
            err.to_string(),
            "Veo API error (429): Resource has been exhausted"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let api = VeoApi::new(format!("{DEFAULT_API_URL}/"), DEFAULT_MODEL.to_string());
        assert_eq!(api.api_url, DEFAULT_API_URL);
        assert_eq!(api.model(), DEFAULT_MODEL);
    }
}
