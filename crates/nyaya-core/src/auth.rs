//! Mock authentication and the local session file.
//!
//! Authentication is a demo shell, not a security boundary: any non-blank
//! credentials are accepted. The logged-in user is remembered in a small
//! JSON key-value file so the display name survives between invocations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::CoreError;

/// Session key holding the logged-in user.
pub const USER_KEY: &str = "nyaya_user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
}

pub trait Authenticator {
    fn login(&self, email: &str, password: &str) -> Result<User, CoreError>;
    fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, CoreError>;
}

/// Accepts any non-blank credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockAuthenticator;

impl Authenticator for MockAuthenticator {
    /// The display name is the local part of the email address.
    fn login(&self, email: &str, password: &str) -> Result<User, CoreError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(CoreError::Auth("please enter email and password".into()));
        }
        let name = email.split('@').next().unwrap_or(email).to_string();
        Ok(User {
            email: email.to_string(),
            name,
        })
    }

    fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, CoreError> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(CoreError::Auth("please fill in all fields".into()));
        }
        Ok(User {
            email: email.to_string(),
            name: name.to_string(),
        })
    }
}

/// File-backed string-keyed JSON store.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub const FILE_NAME: &'static str = "session.json";

    /// Store at `<dir>/session.json`. The directory is created on first write.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, Value>, CoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let bytes = std::fs::read(&self.path)?;
        if bytes.is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&self, entries: &BTreeMap<String, Value>) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>, CoreError> {
        Ok(self.load()?.remove(key))
    }

    pub fn set(&self, key: &str, value: Value) -> Result<(), CoreError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value);
        self.save(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    /// Logged-in user, if any. A malformed entry reads as logged out.
    pub fn user(&self) -> Result<Option<User>, CoreError> {
        Ok(self
            .get(USER_KEY)?
            .and_then(|v| serde_json::from_value(v).ok()))
    }

    pub fn set_user(&self, user: &User) -> Result<(), CoreError> {
        info!(name = %user.name, path = %self.path.display(), "session saved");
        self.set(USER_KEY, serde_json::to_value(user)?)
    }

    pub fn clear_user(&self) -> Result<(), CoreError> {
        self.remove(USER_KEY)
    }
}
