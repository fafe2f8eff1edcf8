use std::{
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    Result,
    accounts::{Accounts, SerializedSession, Session},
    config,
    sdk::Sdk,
};

/// On-disk copy of the CLI's session.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn open() -> Self {
        Self::new(config::session_path())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// `None` when nothing has been stored yet.
    pub async fn load(&self) -> Result<Option<SerializedSession>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub async fn persist(&self, session: &SerializedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(session)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        match async_fs::remove_file(&self.path).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// A stored session wired to write refreshed tokens back to its store.
///
/// The refresh hook only parks the new state in `pending`;
/// [`SessionManager::save`] does the file I/O.
pub struct SessionManager {
    store: SessionStore,
    session: Arc<Session>,
    pending: Arc<Mutex<Option<SerializedSession>>>,
}

impl SessionManager {
    /// `None` when the store is empty.
    pub async fn load(accounts: Arc<Accounts>, store: SessionStore) -> Result<Option<Self>> {
        let Some(stored) = store.load().await? else {
            return Ok(None);
        };

        let pending: Arc<Mutex<Option<SerializedSession>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&pending);
        let session = Session::restore(accounts, stored).with_refresh_hook(move |refreshed| {
            *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(refreshed.clone());
        });

        Ok(Some(Self {
            store,
            session: Arc::new(session),
            pending,
        }))
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// An SDK over the stored session, refreshed first when it has expired or
    /// carries no access token.
    pub async fn sdk(&self) -> Result<Sdk> {
        let stale = self.session.expired().unwrap_or(false)
            || self.session.access_token().trim().is_empty();
        if stale {
            self.session.try_refresh().await?;
            self.save().await?;
        }
        Ok(Sdk::new(Arc::clone(&self.session)))
    }

    /// Writes the latest refreshed state, if any refresh happened.
    pub async fn save(&self) -> Result<()> {
        let refreshed = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(refreshed) = refreshed {
            self.store.persist(&refreshed).await?;
            tracing::debug!(path = %self.store.path().display(), "session saved");
        }
        Ok(())
    }
}
