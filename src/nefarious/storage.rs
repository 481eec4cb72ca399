//! Persisted session storage: token and current-user record.
//!
//! Writes are fire-and-forget. A failed write is logged and swallowed so a
//! read-only config directory never breaks an otherwise working session.

use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::nefarious::models::User;

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

/// File-backed store for the session token and user, one file per key.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        SessionStore { dir }
    }

    /// Default store location under the user's config directory.
    pub fn default_dir() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("watchcli")
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Read the persisted token. Missing file means no stored session;
    /// unreadable content is treated the same way, with a warning.
    pub fn load_token(&self) -> Option<String> {
        let path = self.dir.join(TOKEN_FILE);
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(token) => {
                let token = token.trim().to_string();
                if token.is_empty() {
                    None
                } else {
                    Some(token)
                }
            }
            Err(e) => {
                warn!("failed to read persisted token from {:?}: {}", path, e);
                None
            }
        }
    }

    pub fn load_user(&self) -> Option<User> {
        let path = self.dir.join(USER_FILE);
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<User>(&content) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("failed to parse persisted user from {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                warn!("failed to read persisted user from {:?}: {}", path, e);
                None
            }
        }
    }

    /// Persist the token. Fire-and-forget.
    pub fn save_token(&self, token: &str) {
        self.write(TOKEN_FILE, token.as_bytes());
    }

    /// Persist the current user. Fire-and-forget.
    pub fn save_user(&self, user: &User) {
        match serde_json::to_vec_pretty(user) {
            Ok(content) => self.write(USER_FILE, &content),
            Err(e) => warn!("failed to serialize user for persistence: {}", e),
        }
    }

    /// Delete both persisted keys, e.g. on logout.
    pub fn clear(&self) {
        for name in [TOKEN_FILE, USER_FILE] {
            let path = self.dir.join(name);
            if path.exists() {
                if let Err(e) = fs::remove_file(&path) {
                    warn!("failed to remove {:?}: {}", path, e);
                }
            }
        }
    }

    fn write(&self, name: &str, content: &[u8]) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!("failed to create session store dir {:?}: {}", self.dir, e);
            return;
        }
        let path = self.dir.join(name);
        match fs::write(&path, content) {
            Ok(()) => debug!("persisted {:?}", path),
            Err(e) => warn!("failed to persist {:?}: {}", path, e),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::new(Self::default_dir())
    }
}
