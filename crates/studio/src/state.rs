//! Generation state machine.
//!
//! [`GenerationState`] is the single record the presentation layer reads
//! to decide what to show. It changes only through [`reduce`].

/// Progress line set when a submission is accepted.
pub const MSG_SUBMITTED: &str = "Initializing Neuro-Synthesizer...";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationState {
    pub is_generating: bool,
    pub progress_message: String,
    pub error: Option<String>,
    pub video_url: Option<String>,
    /// Gate closed: the presentation shows the credential prompt instead
    /// of the generator.
    pub needs_credential: bool,
}

/// Which screen the state corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Generating,
    Succeeded,
    Failed,
    NeedsCredential,
}

impl GenerationState {
    pub fn phase(&self) -> Phase {
        if self.needs_credential {
            Phase::NeedsCredential
        } else if self.is_generating {
            Phase::Generating
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.video_url.is_some() {
            Phase::Succeeded
        } else {
            Phase::Idle
        }
    }
}

/// Every transition the state machine accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateAction {
    /// A validated request was submitted.
    Begin,
    /// The workflow reported a status line.
    Progress(String),
    /// The workflow returned a media URI.
    Succeeded(String),
    /// The workflow failed. `credential` marks a credential-kind failure.
    Failed { message: String, credential: bool },
    /// "Generate another clip": leave the result screen.
    DismissResult,
    /// "Restart core": leave the error screen.
    DismissError,
    /// Show an existing project's media.
    ShowProject(String),
    /// Result of querying the credential gate.
    CredentialChecked(bool),
    /// The provisioning dialog closed; assumed successful.
    CredentialProvisioned,
}

/// Apply `action` to `state`.
pub fn reduce(state: &mut GenerationState, action: StateAction) {
    match action {
        StateAction::Begin => {
            state.is_generating = true;
            state.error = None;
            state.video_url = None;
            state.progress_message = MSG_SUBMITTED.to_string();
        }
        StateAction::Progress(message) => {
            if state.is_generating {
                state.progress_message = message;
            }
        }
        StateAction::Succeeded(url) => {
            state.is_generating = false;
            state.video_url = Some(url);
        }
        StateAction::Failed {
            message,
            credential,
        } => {
            state.is_generating = false;
            state.error = Some(message);
            state.needs_credential = credential;
        }
        StateAction::DismissResult => state.video_url = None,
        StateAction::DismissError => state.error = None,
        StateAction::ShowProject(url) => {
            if !state.is_generating {
                state.video_url = Some(url);
            }
        }
        StateAction::CredentialChecked(has) => state.needs_credential = !has,
        StateAction::CredentialProvisioned => state.needs_credential = false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: &mut GenerationState, actions: Vec<StateAction>) {
        for action in actions {
            reduce(state, action);
        }
    }

    #[test]
    fn default_is_idle() {
        assert_eq!(GenerationState::default().phase(), Phase::Idle);
    }

    #[test]
    fn begin_clears_previous_outcome() {
        let mut state = GenerationState {
            error: Some("boom".into()),
            video_url: Some("https://v".into()),
            ..Default::default()
        };
        reduce(&mut state, StateAction::Begin);
        assert_eq!(state.phase(), Phase::Generating);
        assert!(state.error.is_none());
        assert!(state.video_url.is_none());
        assert_eq!(state.progress_message, MSG_SUBMITTED);
    }

    #[test]
    fn success_path() {
        let mut state = GenerationState::default();
        apply(
            &mut state,
            vec![
                StateAction::Begin,
                StateAction::Progress("Transmitting".into()),
                StateAction::Succeeded("https://v/1".into()),
            ],
        );
        assert_eq!(state.phase(), Phase::Succeeded);
        assert_eq!(state.progress_message, "Transmitting");

        reduce(&mut state, StateAction::DismissResult);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn generic_failure_then_dismiss() {
        let mut state = GenerationState::default();
        apply(
            &mut state,
            vec![
                StateAction::Begin,
                StateAction::Failed {
                    message: "Veo API error (500): oops".into(),
                    credential: false,
                },
            ],
        );
        assert_eq!(state.phase(), Phase::Failed);
        assert!(!state.needs_credential);

        reduce(&mut state, StateAction::DismissError);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn credential_failure_closes_the_gate() {
        let mut state = GenerationState::default();
        apply(
            &mut state,
            vec![
                StateAction::Begin,
                StateAction::Failed {
                    message: "Requested entity was not found.".into(),
                    credential: true,
                },
            ],
        );
        assert_eq!(state.phase(), Phase::NeedsCredential);
        assert!(state.error.is_some());

        reduce(&mut state, StateAction::CredentialProvisioned);
        assert_eq!(state.phase(), Phase::Failed);
    }

    #[test]
    fn progress_after_completion_is_ignored() {
        let mut state = GenerationState::default();
        apply(
            &mut state,
            vec![
                StateAction::Begin,
                StateAction::Succeeded("https://v/1".into()),
                StateAction::Progress("late".into()),
            ],
        );
        assert_eq!(state.progress_message, MSG_SUBMITTED);
    }

    #[test]
    fn show_project_is_ignored_while_generating() {
        let mut state = GenerationState::default();
        reduce(&mut state, StateAction::Begin);
        reduce(&mut state, StateAction::ShowProject("https://v/old".into()));
        assert!(state.video_url.is_none());

        reduce(&mut state, StateAction::Failed {
            message: "x".into(),
            credential: false,
        });
        reduce(&mut state, StateAction::ShowProject("https://v/old".into()));
        assert_eq!(state.video_url.as_deref(), Some("https://v/old"));
    }

    #[test]
    fn credential_check_sets_gate() {
        let mut state = GenerationState::default();
        reduce(&mut state, StateAction::CredentialChecked(false));
        assert_eq!(state.phase(), Phase::NeedsCredential);
        reduce(&mut state, StateAction::CredentialChecked(true));
        assert_eq!(state.phase(), Phase::Idle);
    }
}
