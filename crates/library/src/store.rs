//! The ordered, persisted project library.
//!
//! [`ProjectStore`] owns the in-memory list and writes the complete list
//! back to its [`KvStore`] after every mutation. Newest projects go to
//! the front; after a manual reorder the order is whatever the user set.

use std::path::Path;
use std::sync::Arc;

use p2f_core::project::Project;

use crate::kv::KvStore;
use crate::reorder::moved;
use crate::{export, LibraryError};

/// Storage key holding the serialized library.
pub const LIBRARY_KEY: &str = "p2f_projects";

pub struct ProjectStore {
    kv: Arc<dyn KvStore>,
    projects: Vec<Project>,
}

impl ProjectStore {
    /// Load the library from `kv`.
    ///
    /// Unreadable or malformed data is logged and treated as an empty
    /// library; it is left in place until the next mutation overwrites it.
    pub fn load(kv: Arc<dyn KvStore>) -> Self {
        let projects = match kv.get(LIBRARY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Project>>(&raw) {
                Ok(projects) => projects,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load projects; starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read project storage; starting empty");
                Vec::new()
            }
        };

        tracing::debug!(count = projects.len(), "Project library loaded");
        Self { kv, projects }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Insert `project` at the front and persist.
    ///
    /// If the write fails the library is left as it was.
    pub fn append(&mut self, project: Project) -> Result<(), LibraryError> {
        tracing::info!(project_id = %project.id, "Adding project to library");
        let mut candidate = Vec::with_capacity(self.projects.len() + 1);
        candidate.push(project);
        candidate.extend(self.projects.iter().cloned());
        self.commit(candidate)
    }

    /// Replace the library with `reordered` and persist.
    ///
    /// `reordered` must contain exactly the current projects in any
    /// order. Anything else, or a failed write, leaves the library
    /// unchanged.
    pub fn reorder(&mut self, reordered: Vec<Project>) -> Result<(), LibraryError> {
        if !is_permutation(&self.projects, &reordered) {
            return Err(LibraryError::NotAPermutation {
                expected: self.projects.len(),
                got: reordered.len(),
            });
        }
        self.commit(reordered)
    }

    /// Move the project at `from` to `to` and persist.
    ///
    /// Returns `false` without touching storage when nothing moves.
    pub fn move_project(&mut self, from: usize, to: usize) -> Result<bool, LibraryError> {
        match moved(&self.projects, from, to) {
            Some(reordered) => {
                self.reorder(reordered)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Discard every project and the persisted entry.
    pub fn clear(&mut self) -> Result<(), LibraryError> {
        tracing::info!(count = self.projects.len(), "Clearing project library");
        self.kv.remove(LIBRARY_KEY)?;
        self.projects.clear();
        Ok(())
    }

    /// Write the library as a JSON manifest to `path`.
    pub fn export_manifest(&self, path: &Path) -> Result<(), LibraryError> {
        export::write_manifest(&self.projects, path)
    }

    /// Write `projects` to storage, then adopt them as the library.
    fn commit(&mut self, projects: Vec<Project>) -> Result<(), LibraryError> {
        let raw = serde_json::to_string(&projects)?;
        self.kv.set(LIBRARY_KEY, &raw)?;
        self.projects = projects;
        Ok(())
    }
}

/// Whether `candidate` holds exactly the elements of `current`.
fn is_permutation(current: &[Project], candidate: &[Project]) -> bool {
    if current.len() != candidate.len() {
        return false;
    }
    let mut a: Vec<&Project> = current.iter().collect();
    let mut b: Vec<&Project> = candidate.iter().collect();
    a.sort_by(|x, y| x.id.cmp(&y.id));
    b.sort_by(|x, y| x.id.cmp(&y.id));
    a == b
}
