use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::{
    error::StoreError,
    models::{GameState, GameSummary, PlayerId},
};

/// Where game state lives between operations. Each call is atomic: a failed
/// `save` leaves the previously stored state in place.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    async fn load(&self, game_id: Uuid) -> Result<GameState, StoreError>;

    async fn save(&self, state: &GameState) -> Result<(), StoreError>;

    /// Summaries of every game the player has a seat in, newest first
    async fn list_for_player(&self, player_id: PlayerId) -> Result<Vec<GameSummary>, StoreError>;
}

/// In-process store, used when no database is configured and in tests
#[derive(Default)]
pub struct MemoryStore {
    games: DashMap<Uuid, GameState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[async_trait]
impl PersistenceStore for MemoryStore {
    async fn load(&self, game_id: Uuid) -> Result<GameState, StoreError> {
        self.games
            .get(&game_id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound(game_id))
    }

    async fn save(&self, state: &GameState) -> Result<(), StoreError> {
        self.games.insert(state.game_id, state.clone());
        Ok(())
    }

    async fn list_for_player(&self, player_id: PlayerId) -> Result<Vec<GameSummary>, StoreError> {
        let mut games: Vec<GameSummary> = self
            .games
            .iter()
            .filter(|entry| entry.player(player_id).is_some())
            .map(|entry| entry.summary())
            .collect();
        games.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{setup, Board, TileBag};
    use rand::{rngs::StdRng, SeedableRng};
    use tokio_test::{assert_err, assert_ok};

    fn game(players: &[PlayerId]) -> GameState {
        let mut rng = StdRng::seed_from_u64(1);
        setup::new_game(Uuid::new_v4(), players, Board::standard(), TileBag::standard(), 4, &mut rng).unwrap()
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemoryStore::new();
        let state = game(&[1, 2]);
        assert_ok!(store.save(&state).await);
        assert_eq!(store.load(state.game_id).await.unwrap(), state);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_load_unknown_game() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();
        let err = assert_err!(store.load(missing).await);
        assert!(matches!(err, StoreError::NotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn test_list_for_player() {
        let store = MemoryStore::new();
        store.save(&game(&[1, 2])).await.unwrap();
        store.save(&game(&[2, 3])).await.unwrap();

        assert_eq!(store.list_for_player(2).await.unwrap().len(), 2);
        assert_eq!(store.list_for_player(1).await.unwrap().len(), 1);
        assert!(store.list_for_player(9).await.unwrap().is_empty());
    }
}
