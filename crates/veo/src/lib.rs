//! Client library for the remote Veo video-synthesis service.
//!
//! Provides the wire message types for the long-running-operation API,
//! a [`reqwest`]-based REST client, the [`synthesis::SynthesisApi`]
//! seam the generation workflow is written against, and the credential
//! gate guarding access to the service.

pub mod api;
pub mod credentials;
pub mod messages;
pub mod synthesis;

/// Text the service puts in its error body when the credential's
/// project cannot be resolved (invalid, expired or unbilled key).
pub const ENTITY_NOT_FOUND_MARKER: &str = "Requested entity was not found";
