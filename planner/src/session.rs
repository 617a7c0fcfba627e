//! Session bootstrap: identity and store handle
//!
//! Runs once at startup. Identity problems are never fatal (an ephemeral
//! anonymous id is used instead); a store that cannot be opened is.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, IdentityConfig, IdentityMode};
use crate::gateway::{GatewayError, PlanGateway};

/// File inside the store directory holding the anonymous id
pub const IDENTITY_FILE: &str = "identity";

/// Errors resolving the user identity
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Token mode is configured but no token was provided")]
    MissingToken,

    #[error("Identity '{0}' is not usable as a user id")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Errors that block the application from starting
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Could not open the plan store at {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: GatewayError,
    },
}

/// A ready identity plus store handle
#[derive(Clone)]
pub struct Session {
    pub user_id: String,
    pub gateway: PlanGateway,
    pub store_dir: PathBuf,
    /// Whether the identity survives a restart
    pub persistent: bool,
}

/// Resolve the identity and open the store
///
/// Must be called from within a tokio runtime (the gateway actor is spawned).
pub fn bootstrap(config: &Config) -> Result<Session, BootstrapError> {
    let store_dir = config.storage.resolved_path();
    debug!(store_dir = %store_dir.display(), mode = ?config.identity.mode, "bootstrap: called");

    let gateway = PlanGateway::spawn(&store_dir).map_err(|source| BootstrapError::Store {
        path: store_dir.clone(),
        source,
    })?;

    let (user_id, persistent) = match resolve_identity(&config.identity, &store_dir) {
        Ok(id) => (id, true),
        Err(e) => {
            let id = ephemeral_id();
            warn!(error = %e, user_id = %id, "bootstrap: identity failed, using ephemeral id");
            (id, false)
        }
    };

    info!(%user_id, persistent, "Session ready");
    Ok(Session {
        user_id,
        gateway,
        store_dir,
        persistent,
    })
}

/// Resolve the configured identity
pub fn resolve_identity(config: &IdentityConfig, data_dir: &Path) -> Result<String, IdentityError> {
    debug!(mode = ?config.mode, "resolve_identity: called");
    match config.mode {
        IdentityMode::Anonymous => load_or_create_anonymous(data_dir),
        IdentityMode::Token => {
            let token = config.resolve_token().ok_or(IdentityError::MissingToken)?;
            validate_id(token.trim())
        }
    }
}

/// Load the persisted anonymous id, creating one on first run
pub fn load_or_create_anonymous(data_dir: &Path) -> Result<String, IdentityError> {
    let path = data_dir.join(IDENTITY_FILE);
    match fs::read_to_string(&path) {
        Ok(content) => {
            debug!(path = %path.display(), "load_or_create_anonymous: found identity file");
            validate_id(content.trim())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let id = ephemeral_id();
            fs::create_dir_all(data_dir)?;
            fs::write(&path, &id)?;
            info!(user_id = %id, "Created anonymous identity");
            Ok(id)
        }
        Err(e) => Err(e.into()),
    }
}

/// A fresh anonymous id, `anon-{uuid}`
pub fn ephemeral_id() -> String {
    format!("anon-{}", Uuid::now_v7())
}

/// User ids become a path segment, so they must be non-empty and slash-free
fn validate_id(id: &str) -> Result<String, IdentityError> {
    if id.is_empty() || id.contains('/') {
        return Err(IdentityError::Invalid(id.to_string()));
    }
    Ok(id.to_string())
}
