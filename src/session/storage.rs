//! Persisted session storage.
//!
//! A single key-value pair (user id) in a JSON file, surviving restarts
//! the way the browser original used localStorage.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Storage file format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

/// Session persistence manager.
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    /// Create a storage manager writing to the given file path.
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        Ok(Self { path })
    }

    /// Load the persisted user id, if any.
    pub fn load(&self) -> Result<Option<String>> {
        Ok(self.read_file()?.user_id)
    }

    /// Persist the user id.
    pub fn save(&self, user_id: &str) -> Result<()> {
        self.write_file(&SessionFile {
            user_id: Some(user_id.to_string()),
        })
    }

    /// Remove the persisted user id.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Could not remove {}", self.path.display()))?;
        }
        Ok(())
    }

    fn read_file(&self) -> Result<SessionFile> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let file: SessionFile = serde_json::from_str(&content)?;
        Ok(file)
    }

    fn write_file(&self, file: &SessionFile) -> Result<()> {
        let content = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, content)?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, permissions)?;
        }

        Ok(())
    }
}
