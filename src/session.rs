//! Session termination
//!
//! Logging out is purely client-side: drop the `access_token` credential and
//! go to the login page.

use std::path::{Path, PathBuf};

use crate::error::DashResult;
use crate::view::{Navigator, Page};

/// Name of the session cookie set by `/login`
pub const SESSION_COOKIE: &str = "access_token";

/// Wherever the client keeps its session credential
pub trait SessionStore {
    fn clear_session(&self) -> DashResult<()>;
}

/// Cookie string that expires the session cookie in a browser
pub fn expired_cookie() -> String {
    format!("{}=;expires=Thu, 01 Jan 1970 00:00:00 UTC;", SESSION_COOKIE)
}

/// Clear the credential and navigate to the login page
pub fn logout<S, N>(store: &S, nav: &N) -> DashResult<()>
where
    S: SessionStore + ?Sized,
    N: Navigator + ?Sized,
{
    store.clear_session()?;
    tracing::info!("Session cleared");
    nav.navigate(Page::Login);
    Ok(())
}

/// Session token persisted between CLI invocations
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored token, or `None` when logged out
    pub fn load(&self) -> DashResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, token: &str) -> DashResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }
}

impl SessionStore for TokenFile {
    fn clear_session(&self) -> DashResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(feature = "native")]
impl Default for TokenFile {
    fn default() -> Self {
        Self::new(default_token_path())
    }
}

/// `<data dir>/expense-dash/session`
#[cfg(feature = "native")]
pub fn default_token_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("expense-dash").join("session"))
        .unwrap_or_else(|| PathBuf::from("./.expense-dash-session"))
}
