//! Best-effort persistence of the settings snapshot.
//!
//! Nothing here returns an error to the caller: a store that cannot be
//! reached degrades to a logged no-op so boot and in-memory writes proceed.

use crate::config::PersistenceConfig;
use crate::db::actor::{self, DbActorHandle};
use crate::error::CastorError;
use castor_schema::FullSnapshot;
use castor_schema::snapshot::VOLATILE_FIELD;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Row name every snapshot is stored under.
pub const TENANT_MARKER: &str = "DEFAULT";

#[derive(Clone)]
pub struct PersistenceGateway {
    db: Option<DbActorHandle>,
    usable: Arc<AtomicBool>,
}

impl PersistenceGateway {
    /// Opens the store described by `cfg`. A disabled or unreachable store
    /// yields a gateway that is unusable from the start.
    pub async fn connect(cfg: &PersistenceConfig) -> Self {
        if !cfg.enabled {
            info!("Persistence disabled by configuration");
            return Self::disabled();
        }
        match actor::spawn(cfg).await {
            Ok(handle) => {
                info!(database_url = %cfg.database_url, "Persistence store connected");
                Self {
                    db: Some(handle),
                    usable: Arc::new(AtomicBool::new(true)),
                }
            }
            Err(e) => {
                warn!(
                    database_url = %cfg.database_url,
                    error = %e,
                    "Persistence store unavailable; running in-memory only"
                );
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            db: None,
            usable: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.db.is_some() && self.usable.load(Ordering::Acquire)
    }

    /// Turns every later save/load into a no-op.
    pub fn mark_unusable(&self) {
        if self.usable.swap(false, Ordering::AcqRel) {
            warn!("Persistence store marked unusable");
        }
    }

    fn handle(&self) -> Result<&DbActorHandle, CastorError> {
        match &self.db {
            Some(db) if self.usable.load(Ordering::Acquire) => Ok(db),
            _ => Err(CastorError::StoreUnavailable(
                "persistence store is not usable".to_string(),
            )),
        }
    }

    /// Serializes `snapshot` without its volatile subtree and upserts it.
    /// Returns whether a row was written.
    pub async fn save(&self, snapshot: &FullSnapshot) -> bool {
        match self.try_save(snapshot).await {
            Ok(()) => {
                info!(tenant = TENANT_MARKER, "Settings snapshot persisted");
                true
            }
            Err(e @ CastorError::StoreUnavailable(_)) => {
                debug!(error = %e, "Skipping snapshot save");
                false
            }
            Err(e) => {
                if matches!(e, CastorError::DatabaseError(sqlx::Error::PoolClosed)) {
                    self.mark_unusable();
                }
                warn!(error = %e, "Failed to persist settings snapshot");
                false
            }
        }
    }

    async fn try_save(&self, snapshot: &FullSnapshot) -> Result<(), CastorError> {
        let db = self.handle()?;
        let document = persisted_document(snapshot)?;
        db.save_settings(TENANT_MARKER, document).await
    }

    /// Fetches the stored snapshot. A missing row, an unreachable store and
    /// an unreadable document all come back as `None`.
    pub async fn load(&self) -> Option<FullSnapshot> {
        let db = match self.handle() {
            Ok(db) => db,
            Err(e) => {
                debug!(error = %e, "Skipping snapshot load");
                return None;
            }
        };

        let row = match db.load_settings(TENANT_MARKER).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                info!(tenant = TENANT_MARKER, "No persisted settings snapshot");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted settings snapshot");
                return None;
            }
        };

        match serde_json::from_str::<FullSnapshot>(&row.settings) {
            Ok(snapshot) => {
                info!(
                    tenant = TENANT_MARKER,
                    updated_at = %row.updated_at,
                    "Persisted settings snapshot loaded"
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable persisted settings snapshot");
                None
            }
        }
    }

    /// Stops the store actor. The gateway is unusable afterwards.
    pub async fn close(&self) {
        self.usable.store(false, Ordering::Release);
        if let Some(db) = &self.db {
            db.stop().await;
        }
    }
}

/// The stored form of a snapshot: its JSON document minus the volatile subtree.
pub fn persisted_document(snapshot: &FullSnapshot) -> Result<String, CastorError> {
    let mut value = serde_json::to_value(snapshot)?;
    if let Value::Object(map) = &mut value {
        map.remove(VOLATILE_FIELD);
    }
    Ok(serde_json::to_string(&value)?)
}
