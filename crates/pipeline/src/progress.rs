//! Progress reporting for an in-flight generation.

/// Status line shown when the workflow starts.
pub const MSG_INITIALIZING: &str = "Initializing Secure Node...";
/// Status line shown while the job is being submitted.
pub const MSG_TRANSMITTING: &str = "Transmitting neural weights...";
/// Status line shown once the job is queued remotely.
pub const MSG_RENDERING: &str = "Neural Rendering Active (Est: 2min)...";
/// Status line shown when the operation reports done.
pub const MSG_FINALIZED: &str = "Synthesis Finalized.";

/// Rotating status lines, keyed by the poll-count divisor that shows them.
const CADENCE: [(u32, &str); 3] = [
    (3, "Stitching temporal vectors..."),
    (7, "Applying volumetric lighting..."),
    (11, "Finalizing frame buffer..."),
];

/// Receives human-readable progress messages.
pub trait ProgressSink: Send + Sync {
    fn report(&self, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// Cosmetic messages due on poll number `poll` (1-based).
pub fn cadence_messages(poll: u32) -> impl Iterator<Item = &'static str> {
    CADENCE
        .into_iter()
        .filter(move |(every, _)| poll % every == 0)
        .map(|(_, message)| message)
}
