//! Veo long-running-operation wire types.
//!
//! Submission is a `predictLongRunning` call returning an operation
//! object; polling re-fetches that object by name until `done` is set.
//! Only the fields the workflow reads are modelled.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Body of `POST /models/{model}:predictLongRunning`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest<'a> {
    pub instances: Vec<PredictInstance<'a>>,
    pub parameters: PredictParameters<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictInstance<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters<'a> {
    pub aspect_ratio: &'a str,
    pub resolution: &'a str,
    pub sample_count: u32,
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// A remote long-running operation, as returned by both submission and
/// status queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Operation {
    /// Server-assigned resource name, e.g. `models/veo/operations/abc123`.
    pub name: String,
    /// Absent until the operation finishes.
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub response: Option<OperationResponse>,
    /// Set instead of `response` when the operation finished with a failure.
    #[serde(default)]
    pub error: Option<OperationError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedSample {
    #[serde(default)]
    pub video: Option<VideoRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoRef {
    #[serde(default)]
    pub uri: Option<String>,
}

/// Status object of a failed operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub message: String,
}

impl Operation {
    /// A pending operation with the given name.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A finished operation carrying one generated video.
    pub fn completed(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: true,
            response: Some(OperationResponse {
                generate_video_response: Some(GenerateVideoResponse {
                    generated_samples: vec![GeneratedSample {
                        video: Some(VideoRef {
                            uri: Some(uri.into()),
                        }),
                    }],
                }),
            }),
            error: None,
        }
    }

    /// URI of the first generated video, if the operation produced one.
    pub fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .first()?
            .video
            .as_ref()?
            .uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pending_operation() {
        let op: Operation =
            serde_json::from_str(r#"{"name":"models/veo/operations/abc"}"#).unwrap();
        assert_eq!(op.name, "models/veo/operations/abc");
        assert!(!op.done);
        assert!(op.video_uri().is_none());
    }

    #[test]
    fn parse_completed_operation() {
        let json = r#"{
            "name": "models/veo/operations/abc",
            "done": true,
            "response": {
                "@type": "type.googleapis.com/google.ai.generativelanguage.v1beta.PredictLongRunningResponse",
                "generateVideoResponse": {
                    "generatedSamples": [
                        {"video": {"uri": "https://files.example/v1beta/files/xyz:download?alt=media"}}
                    ]
                }
            }
        }"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        assert!(op.done);
        assert_eq!(
            op.video_uri(),
            Some("https://files.example/v1beta/files/xyz:download?alt=media")
        );
    }

    #[test]
    fn completed_without_samples_has_no_uri() {
        let json = r#"{"name":"op","done":true,"response":{"generateVideoResponse":{}}}"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        assert!(op.done);
        assert!(op.video_uri().is_none());
    }

    #[test]
    fn parse_failed_operation() {
        let json = r#"{"name":"op","done":true,"error":{"code":3,"message":"prompt blocked"}}"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        let err = op.error.unwrap();
        assert_eq!(err.code, Some(3));
        assert_eq!(err.message, "prompt blocked");
    }

    #[test]
    fn predict_request_uses_camel_case_parameters() {
        let body = PredictRequest {
            instances: vec![PredictInstance { prompt: "p" }],
            parameters: PredictParameters {
                aspect_ratio: "9:16",
                resolution: "1080p",
                sample_count: 1,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["instances"][0]["prompt"], "p");
        assert_eq!(json["parameters"]["aspectRatio"], "9:16");
        assert_eq!(json["parameters"]["sampleCount"], 1);
    }
}
