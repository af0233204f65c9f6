use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    error::StoreError,
    models::{GameState, GameSummary, PlayerId},
    store::PersistenceStore,
};

/// Postgres-backed store. Each game is one row holding the full state as
/// JSONB, so a save is a single-statement upsert.
#[derive(Clone)]
pub struct PgGameStore {
    pool: PgPool,
}

impl PgGameStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersistenceStore for PgGameStore {
    async fn load(&self, game_id: Uuid) -> Result<GameState, StoreError> {
        let row = sqlx::query_as::<_, (Json<GameState>,)>(
            "SELECT state FROM game_states WHERE game_id = $1",
        )
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(Json(state),)| state)
            .ok_or(StoreError::NotFound(game_id))
    }

    async fn save(&self, state: &GameState) -> Result<(), StoreError> {
        let player_ids: Vec<PlayerId> = state.players.iter().map(|p| p.id).collect();

        sqlx::query(
            r#"
            INSERT INTO game_states (game_id, status, player_ids, state, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (game_id) DO UPDATE SET
                status = EXCLUDED.status,
                state = EXCLUDED.state,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(state.game_id)
        .bind(state.status.as_str())
        .bind(player_ids)
        .bind(Json(state))
        .bind(state.created_at)
        .bind(state.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save game {}: {}", state.game_id, e);
            e
        })?;

        Ok(())
    }

    async fn list_for_player(&self, player_id: PlayerId) -> Result<Vec<GameSummary>, StoreError> {
        let rows = sqlx::query_as::<_, (Json<GameState>,)>(
            r#"
            SELECT state FROM game_states
            WHERE $1 = ANY(player_ids)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|(Json(state),)| state.summary()).collect())
    }
}
