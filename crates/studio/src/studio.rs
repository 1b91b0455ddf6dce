//! The studio composition root.
//!
//! [`Studio`] is the only writer of the [`GenerationState`]; readers
//! observe it through [`Studio::subscribe`]. Mutating operations take
//! `&mut self`, so at most one generation runs per studio.

use std::path::Path;

use p2f_core::error::CoreError;
use p2f_core::project::Project;
use p2f_core::request::GenerationRequest;
use p2f_library::reorder::DragSession;
use p2f_library::ProjectStore;
use p2f_pipeline::GenerationWorkflow;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::StudioError;
use crate::state::{reduce, GenerationState, StateAction};

/// Behaviour switches for a [`Studio`].
#[derive(Debug, Clone, Default)]
pub struct StudioOptions {
    /// After the provisioning dialog closes, query the gate again instead
    /// of assuming a credential was selected.
    pub recheck_credential_after_select: bool,
}

pub struct Studio {
    workflow: GenerationWorkflow,
    library: ProjectStore,
    state: watch::Sender<GenerationState>,
    drag: DragSession,
    options: StudioOptions,
}

impl Studio {
    /// Assemble a studio and run the startup credential check.
    pub async fn open(
        workflow: GenerationWorkflow,
        library: ProjectStore,
        options: StudioOptions,
    ) -> Self {
        let (state, _) = watch::channel(GenerationState::default());
        let studio = Self {
            workflow,
            library,
            state,
            drag: DragSession::new(),
            options,
        };

        let has = studio.workflow.gate().has_credential().await;
        tracing::info!(
            has_credential = has,
            projects = studio.library.len(),
            "Studio opened"
        );
        studio.dispatch(StateAction::CredentialChecked(has));
        studio
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> GenerationState {
        self.state.borrow().clone()
    }

    /// Observe every state transition.
    pub fn subscribe(&self) -> watch::Receiver<GenerationState> {
        self.state.subscribe()
    }

    pub fn projects(&self) -> &[Project] {
        self.library.projects()
    }

    fn dispatch(&self, action: StateAction) {
        self.state.send_modify(|state| reduce(state, action));
    }

    // ---- generation ----

    /// Run one generation to completion.
    ///
    /// On success the new project is put at the front of the library and
    /// returned. Failing to persist it is logged; the generation still
    /// counts as successful.
    pub async fn generate(&mut self, request: GenerationRequest) -> Result<Project, StudioError> {
        self.generate_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// [`generate`](Self::generate) that stops polling once `cancel` fires.
    pub async fn generate_with_cancel(
        &mut self,
        request: GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<Project, StudioError> {
        if self.state.borrow().needs_credential {
            return Err(StudioError::CredentialRequired);
        }

        self.dispatch(StateAction::Begin);

        let state = &self.state;
        let sink = |message: &str| {
            state.send_modify(|s| reduce(s, StateAction::Progress(message.to_string())));
        };
        let result = self.workflow.generate(&request, &sink, cancel).await;

        match result {
            Ok(url) => {
                self.dispatch(StateAction::Succeeded(url.clone()));
                let project = Project::new(url, request.prompt());
                if let Err(e) = self.library.append(project.clone()) {
                    tracing::error!(project_id = %project.id, error = %e, "Failed to persist project");
                }
                Ok(project)
            }
            Err(e) => {
                self.dispatch(StateAction::Failed {
                    message: e.to_string(),
                    credential: e.is_credential_error(),
                });
                Err(e.into())
            }
        }
    }

    /// Leave the result screen.
    pub fn dismiss_result(&mut self) {
        self.dispatch(StateAction::DismissResult);
    }

    /// Leave the error screen.
    pub fn dismiss_error(&mut self) {
        self.dispatch(StateAction::DismissError);
    }

    /// Show the media of a library project.
    pub fn select_project(&mut self, id: &str) -> Result<(), StudioError> {
        let project = self.library.get(id).ok_or_else(|| CoreError::NotFound {
            entity: "project",
            id: id.to_string(),
        })?;
        self.dispatch(StateAction::ShowProject(project.url.clone()));
        Ok(())
    }

    // ---- credentials ----

    /// Open the credential provisioning flow and reopen the gate.
    pub async fn request_credential(&mut self) {
        let gate = self.workflow.gate();
        gate.request_credential().await;

        if self.options.recheck_credential_after_select {
            let has = gate.has_credential().await;
            self.dispatch(StateAction::CredentialChecked(has));
        } else {
            self.dispatch(StateAction::CredentialProvisioned);
        }
    }

    // ---- library ----

    /// Pick up the project at `index` for reordering.
    pub fn begin_drag(&mut self, index: usize) {
        self.drag.start(index);
    }

    pub fn drag_over(&mut self, index: usize) {
        self.drag.hover(index);
    }

    /// The index currently highlighted as the drop target.
    pub fn drag_target(&self) -> Option<usize> {
        self.drag.hovered()
    }

    /// Release the dragged project over `index`. Returns whether the
    /// library changed.
    pub fn drop_on(&mut self, index: usize) -> Result<bool, StudioError> {
        match self.drag.drop_on(index, self.library.projects()) {
            Some(reordered) => {
                self.library.reorder(reordered)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn end_drag(&mut self) {
        self.drag.end();
    }

    /// Move the project at `from` to `to` as one drag gesture.
    pub fn move_project(&mut self, from: usize, to: usize) -> Result<bool, StudioError> {
        self.begin_drag(from);
        self.drag_over(to);
        self.drop_on(to)
    }

    /// Delete the whole library if `confirm` agrees. Returns whether the
    /// library was cleared.
    pub fn clear_library(&mut self, confirm: impl FnOnce() -> bool) -> Result<bool, StudioError> {
        if !confirm() {
            tracing::debug!("Library clear declined");
            return Ok(false);
        }
        self.library.clear()?;
        Ok(true)
    }

    /// Write the library manifest to `path`.
    pub fn export_manifest(&self, path: &Path) -> Result<(), StudioError> {
        self.library.export_manifest(path)?;
        Ok(())
    }
}
