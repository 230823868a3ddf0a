pub mod storage;
pub mod token;

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use self::storage::Storage;

/// Storage key of the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key of the JSON encoded [`Identity`].
pub const USER_KEY: &str = "user";

/// Who the token was issued to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub username: String,
    pub user_id: u64,
}

/// A bearer token together with the identity it represents. A session is either
/// complete or absent, there is no partial state.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>, user_id: u64) -> Self {
        Self {
            token: token.into(),
            identity: Identity {
                username: username.into(),
                user_id,
            },
        }
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn user_id(&self) -> u64 {
        self.identity.user_id
    }
}

/// Owns the current session and mirrors it into durable [`Storage`].
pub struct SessionStore<S: Storage> {
    storage: S,
    current: Option<Session>,
}

impl<S: Storage> SessionStore<S> {
    /// Wraps `storage` and restores any session already persisted there.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            current: None,
        };
        store.current = store.load();
        store
    }

    pub fn save(&mut self, session: Session) -> Result<()> {
        if session.token.is_empty() {
            bail!("refuse to save a session with an empty token");
        }

        let identity = serde_json::to_string(&session.identity).context("encode identity")?;
        let written = self
            .storage
            .set(TOKEN_KEY, &session.token)
            .context("save token")
            .and_then(|_| {
                self.storage
                    .set(USER_KEY, &identity)
                    .context("save identity")
            });
        if let Err(err) = written {
            // A half written session must not outlive the failure.
            self.clear();
            return Err(err);
        }

        debug!("Saved session for user '{}'", session.username());
        self.current = Some(session);
        Ok(())
    }

    /// Reads the persisted session. Missing or corrupted entries mean there is
    /// no session, this never fails.
    pub fn load(&self) -> Option<Session> {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return None,
            Err(err) => {
                warn!("Read stored token failed, treat as logged out: {err:#}");
                return None;
            }
        };

        let identity = match self.storage.get(USER_KEY) {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                warn!("Stored token has no identity, treat as logged out");
                return None;
            }
            Err(err) => {
                warn!("Read stored identity failed, treat as logged out: {err:#}");
                return None;
            }
        };

        let identity: Identity = match serde_json::from_str(&identity) {
            Ok(identity) => identity,
            Err(_) => {
                warn!("Stored identity is not valid json, treat as logged out");
                return None;
            }
        };

        Some(Session { token, identity })
    }

    pub fn clear(&mut self) {
        self.current = None;
        if let Err(err) = self.storage.remove(TOKEN_KEY) {
            warn!("Remove stored token failed: {err:#}");
        }
        if let Err(err) = self.storage.remove(USER_KEY) {
            warn!("Remove stored identity failed: {err:#}");
        }
    }

    pub fn is_valid(&self, token: &str) -> bool {
        token::is_token_valid(token)
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
