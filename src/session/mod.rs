mod storage;

pub use storage::SessionStorage;

use anyhow::Result;
use std::path::PathBuf;

/// The client-side session: at most one logged-in user id, mirrored to
/// persistent storage so a restart does not re-prompt for login.
pub struct Session {
    user_id: Option<String>,
    storage: SessionStorage,
}

impl Session {
    /// Create a logged-out session backed by the given storage file.
    pub fn new(storage_path: PathBuf) -> Result<Self> {
        Ok(Self {
            user_id: None,
            storage: SessionStorage::new(storage_path)?,
        })
    }

    /// Re-establish a persisted session, if one exists.
    ///
    /// No expiry and no validation beyond presence.
    pub fn restore(&mut self) -> Result<()> {
        self.user_id = self.storage.load()?;
        Ok(())
    }

    /// Set the session and persist it.
    ///
    /// The in-memory session is established even when persisting fails;
    /// the caller decides whether to surface the storage error.
    pub fn login(&mut self, user_id: String) -> Result<()> {
        let persisted = self.storage.save(&user_id);
        self.user_id = Some(user_id);
        persisted
    }

    /// Clear the session and the persisted value.
    pub fn logout(&mut self) -> Result<()> {
        self.storage.clear()?;
        self.user_id = None;
        Ok(())
    }

    /// The current user id, if logged in.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }
}
