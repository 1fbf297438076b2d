use crate::config::PersistenceConfig;
use crate::db::models::DbSettingsRow;
use crate::db::schema::SQLITE_INIT;
use crate::error::CastorError;
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::{info, warn};

#[derive(Debug)]
pub enum DbActorMessage {
    /// Upsert the snapshot document stored under a tenant marker.
    /// Fields: tenant marker, JSON document.
    SaveSettings(String, String, RpcReplyPort<Result<(), CastorError>>),

    /// Fetch the row stored under a tenant marker, if any.
    LoadSettings(String, RpcReplyPort<Result<Option<DbSettingsRow>, CastorError>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn save_settings(&self, name: &str, document: String) -> Result<(), CastorError> {
        ractor::call!(
            self.actor,
            DbActorMessage::SaveSettings,
            name.to_string(),
            document
        )
        .map_err(|e| CastorError::RactorError(format!("DbActor SaveSettings RPC failed: {e}")))?
    }

    pub async fn load_settings(&self, name: &str) -> Result<Option<DbSettingsRow>, CastorError> {
        ractor::call!(self.actor, DbActorMessage::LoadSettings, name.to_string()).map_err(|e| {
            CastorError::RactorError(format!("DbActor LoadSettings RPC failed: {e}"))
        })?
    }

    /// Stops the actor and waits for its pool to close.
    pub async fn stop(&self) {
        if let Err(e) = self
            .actor
            .stop_and_wait(None, Some(Duration::from_secs(5)))
            .await
        {
            warn!(error = %e, "DbActor did not stop cleanly");
        }
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = PersistenceConfig;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        cfg: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(cfg.database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections.max(1))
            .acquire_timeout(cfg.acquire_timeout())
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!(max_connections = cfg.max_connections, "DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.pool.close().await;
        info!("DbActor pool closed");
        Ok(())
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::SaveSettings(name, document, reply) => {
                let res = self.save_settings(&state.pool, &name, &document).await;
                let _ = reply.send(res);
            }
            DbActorMessage::LoadSettings(name, reply) => {
                let res = self.load_settings(&state.pool, &name).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn save_settings(
        &self,
        pool: &SqlitePool,
        name: &str,
        document: &str,
    ) -> Result<(), CastorError> {
        let now = Utc::now();
        sqlx::query(
            r#"
        INSERT INTO castor_settings (name, settings, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(name) DO UPDATE SET
            settings = excluded.settings,
            updated_at = excluded.updated_at
        "#,
        )
        .bind(name)
        .bind(document)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn load_settings(
        &self,
        pool: &SqlitePool,
        name: &str,
    ) -> Result<Option<DbSettingsRow>, CastorError> {
        let row = sqlx::query_as::<_, DbSettingsRow>(
            r#"
        SELECT name, settings, created_at, updated_at
        FROM castor_settings
        WHERE name = ?
        "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }
}

/// Spawn the database actor and return a cloneable handle.
///
/// Fails when the database cannot be opened or its schema applied.
pub async fn spawn(cfg: &PersistenceConfig) -> Result<DbActorHandle, CastorError> {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, cfg.clone())
        .await
        .map_err(|e| CastorError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), CastorError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
