//! Credential gate for the synthesis service.
//!
//! [`CredentialGate`] answers whether a usable credential exists and
//! can ask a [`CredentialHost`] to provision one. Without a host the
//! gate falls back to a static credential (normally the `API_KEY`
//! environment variable) and provisioning is a no-op.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Environment variable holding the static credential.
pub const CREDENTIAL_ENV_VAR: &str = "API_KEY";

const KEY_PROMPT: &str = "Paste an API key from a billable project: ";

/// An external credential provisioning host (a key-selection dialog).
#[async_trait]
pub trait CredentialHost: Send + Sync {
    /// Whether the user has already selected a credential.
    async fn has_selected_credential(&self) -> bool;

    /// Open the selection dialog. Returns once the dialog closes; the
    /// outcome is not reported.
    async fn open_select_credential(&self);

    /// The currently selected credential, if any.
    async fn selected_credential(&self) -> Option<String>;
}

/// Check-and-prompt flow guarding access to the synthesis service.
#[derive(Clone, Default)]
pub struct CredentialGate {
    host: Option<Arc<dyn CredentialHost>>,
    static_credential: Option<String>,
}

impl CredentialGate {
    /// A gate backed only by a static credential.
    pub fn with_static(credential: Option<String>) -> Self {
        Self {
            host: None,
            static_credential: credential.filter(|c| !c.trim().is_empty()),
        }
    }

    /// A gate backed by the [`CREDENTIAL_ENV_VAR`] environment variable.
    pub fn from_env() -> Self {
        Self::with_static(std::env::var(CREDENTIAL_ENV_VAR).ok())
    }

    /// Attach a provisioning host. The host takes precedence over the
    /// static credential.
    pub fn with_host(mut self, host: Arc<dyn CredentialHost>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }

    /// Whether a usable credential is available.
    pub async fn has_credential(&self) -> bool {
        match &self.host {
            Some(host) => host.has_selected_credential().await,
            None => self.static_credential.is_some(),
        }
    }

    /// Invoke the host's provisioning dialog; no-op without a host.
    pub async fn request_credential(&self) {
        match &self.host {
            Some(host) => {
                tracing::info!("Opening credential selection");
                host.open_select_credential().await;
            }
            None => {
                tracing::debug!("No credential host; provisioning request ignored");
            }
        }
    }

    /// The credential to authorize calls with.
    pub async fn credential(&self) -> Option<String> {
        match &self.host {
            Some(host) => host.selected_credential().await,
            None => self.static_credential.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// KeyFileHost
// ---------------------------------------------------------------------------

/// Terminal provisioning host that keeps the selected key in a file.
///
/// Selection reads one line from stdin and stores it.
pub struct KeyFileHost {
    path: PathBuf,
}

impl KeyFileHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `key` as the selected credential.
    pub async fn store(&self, key: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, key.trim()).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await?;
        }
        Ok(())
    }

    async fn read_key(&self) -> Option<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Some(contents.trim().to_string()).filter(|k| !k.is_empty()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read key file");
                None
            }
        }
    }
}

#[async_trait]
impl CredentialHost for KeyFileHost {
    async fn has_selected_credential(&self) -> bool {
        self.read_key().await.is_some()
    }

    async fn open_select_credential(&self) {
        if let Err(e) = write_prompt(&mut tokio::io::stdout()).await {
            tracing::warn!(error = %e, "Failed to write key prompt");
        }

        let mut line = String::new();
        if let Err(e) = BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
            tracing::warn!(error = %e, "Failed to read key from terminal");
            return;
        }
        if line.trim().is_empty() {
            tracing::info!("No key entered");
            return;
        }
        match self.store(&line).await {
            Ok(()) => tracing::info!(path = %self.path.display(), "Key stored"),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to store key")
            }
        }
    }

    async fn selected_credential(&self) -> Option<String> {
        self.read_key().await
    }
}

async fn write_prompt<W: AsyncWrite + Unpin>(out: &mut W) -> std::io::Result<()> {
    out.write_all(KEY_PROMPT.as_bytes()).await?;
    out.flush().await
}
