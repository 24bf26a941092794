//! Shared session handle

use super::Session;
use crate::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared, explicitly passed session state
///
/// Cloning the handle shares the same session. Calls read a snapshot and
/// release the lock before any network traffic; only a refresh holds the lock
/// across a request, so concurrent callers wait for it instead of refreshing
/// twice.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionHandle {
    /// Create an empty handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle holding `session`
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(session))),
        }
    }

    /// Copy of the current session
    pub async fn snapshot(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }

    /// Check if a session is present
    pub async fn is_active(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Current access token
    pub async fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|session| session.access_jwt.clone())
    }

    /// Store a session, returning the previous one
    pub async fn replace(&self, session: Session) -> Option<Session> {
        self.inner.write().await.replace(session)
    }

    /// Drop the session, returning it
    pub async fn clear(&self) -> Option<Session> {
        self.inner.write().await.take()
    }

    /// Drop the session if it still uses the refresh token of `expected`
    ///
    /// Returns whether the session was dropped. A session refreshed since
    /// `expected` was read is kept.
    pub async fn clear_if_current(&self, expected: &Session) -> bool {
        let mut guard = self.inner.write().await;
        match guard.as_ref() {
            Some(current) if current.refresh_jwt == expected.refresh_jwt => {
                *guard = None;
                true
            }
            _ => false,
        }
    }

    /// Refresh the session with exclusive access
    ///
    /// `stale` is the session the caller saw fail. The write lock is held while
    /// `refresh` runs. If the stored session no longer matches `stale`, another
    /// caller already refreshed it and the stored session is returned without
    /// calling `refresh`. On error the stored session is left unchanged.
    pub async fn refresh_with<F, Fut>(&self, stale: &Session, refresh: F) -> Result<Session>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<Session>>,
    {
        let mut guard = self.inner.write().await;

        let current = match guard.as_ref() {
            None => return Err(Error::MissingSession),
            Some(current) if current.access_jwt != stale.access_jwt => {
                debug!(did = %current.did, "session already refreshed");
                return Ok(current.clone());
            }
            Some(current) => current.clone(),
        };

        let refreshed = refresh(current).await?;
        *guard = Some(refreshed.clone());
        Ok(refreshed)
    }
}
