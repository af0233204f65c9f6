use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use dashmap::DashMap;
use rand::rngs::StdRng;
use tokio::sync::{Mutex as GameLock, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    dictionary::WordValidator,
    error::{GameError, InfrastructureError},
    game::{
        setup::{self, MAX_SEATS},
        Board, MoveDescriptor, MoveValidator, ScoreResult, Scorer, TileBag, TurnCoordinator,
    },
    models::{GameState, GameSummary, Placement, PlayerId, PlayerView, TurnRecord},
    notify::{GameEvent, NotificationSink},
    store::PersistenceStore,
};

type LockTable = DashMap<Uuid, Arc<GameLock<()>>>;

/// Holds one game's lock. On drop the lock is released and its table entry
/// removed if nobody else is holding or waiting on it.
struct GameGuard {
    game_id: Uuid,
    locks: Arc<LockTable>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for GameGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .remove_if(&self.game_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Entry point for everything that changes a game.
///
/// Mutating calls on one game run strictly one at a time; calls on different
/// games never wait on each other. Validation works on a loaded snapshot and
/// the commit is applied to that copy, so nothing is observable until the
/// store accepts the new state.
pub struct GameEngine {
    store: Arc<dyn PersistenceStore>,
    words: Arc<dyn WordValidator>,
    sink: Arc<dyn NotificationSink>,
    rng: Mutex<StdRng>,
    locks: Arc<LockTable>,
    max_players: usize,
}

impl GameEngine {
    pub fn new(
        store: Arc<dyn PersistenceStore>,
        words: Arc<dyn WordValidator>,
        sink: Arc<dyn NotificationSink>,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            words,
            sink,
            rng: Mutex::new(rng),
            locks: Arc::new(DashMap::new()),
            max_players: MAX_SEATS,
        }
    }

    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    /// Start a game on the standard board with a full bag.
    pub async fn create_game(&self, player_ids: &[PlayerId]) -> Result<GameState, GameError> {
        self.create_game_with(player_ids, Board::standard(), TileBag::standard())
            .await
    }

    /// Start a game on a custom board and bag.
    pub async fn create_game_with(
        &self,
        player_ids: &[PlayerId],
        board: Board,
        bag: TileBag,
    ) -> Result<GameState, GameError> {
        let state = {
            let mut rng = self.rng();
            setup::new_game(Uuid::new_v4(), player_ids, board, bag, self.max_players, &mut *rng)?
        };

        self.store.save(&state).await.map_err(|e| {
            tracing::error!("Failed to save new game {}: {}", state.game_id, e);
            e
        })?;

        if let Some(current) = state.current_player() {
            self.publish(GameEvent::GameCreated {
                game_id: state.game_id,
                players: player_ids.to_vec(),
                current_player: current.id,
            });
        }

        Ok(state)
    }

    /// Validate, commit, score and advance. An empty placement list is a pass
    /// and scores nothing.
    pub async fn submit_move(
        &self,
        game_id: Uuid,
        player_id: PlayerId,
        placements: &[Placement],
    ) -> Result<ScoreResult, GameError> {
        if placements.is_empty() {
            self.pass_turn(game_id, player_id).await?;
            return Ok(ScoreResult::default());
        }

        let (guard, mut state) = self.begin_turn(game_id, player_id).await?;
        let mover_index = state.current_player_index;

        let descriptor = {
            let rack = &state.players[mover_index].rack;
            MoveValidator::validate(&state.board, rack, player_id, placements, self.words.as_ref())
                .inspect_err(|e| {
                    tracing::warn!("Rejected move by player {} in game {}: {}", player_id, game_id, e);
                })?
        };

        let result = self.commit_move(&mut state, mover_index, &descriptor);
        let state = self.persist(state, guard).await?;

        tracing::info!(
            "Player {} scored {} in game {} ({} tiles)",
            player_id,
            result.score,
            game_id,
            descriptor.mutations.len()
        );

        if let Some(next) = state.current_player() {
            self.publish(GameEvent::MovePlayed {
                game_id,
                player_id,
                score: result.score,
                words: result.words.clone(),
                next_player: next.id,
            });
        }
        self.announce_if_finished(&state);

        Ok(result)
    }

    /// Give up the turn without placing anything.
    pub async fn pass_turn(&self, game_id: Uuid, player_id: PlayerId) -> Result<(), GameError> {
        let (guard, mut state) = self.begin_turn(game_id, player_id).await?;

        state.history.push(TurnRecord::Pass {
            player_id,
            played_at: Utc::now(),
        });
        TurnCoordinator::after_pass(&mut state);
        state.updated_at = Utc::now();

        let state = self.persist(state, guard).await?;
        tracing::info!("Player {} passed in game {}", player_id, game_id);

        if let Some(next) = state.current_player() {
            self.publish(GameEvent::TurnPassed {
                game_id,
                player_id,
                next_player: next.id,
            });
        }
        self.announce_if_finished(&state);

        Ok(())
    }

    /// Read-only snapshot of a game
    pub async fn get_state(&self, game_id: Uuid) -> Result<GameState, GameError> {
        Ok(self.store.load(game_id).await?)
    }

    /// What one player is allowed to see. `None` if they are not seated.
    pub async fn player_view(&self, game_id: Uuid, player_id: PlayerId) -> Result<Option<PlayerView>, GameError> {
        Ok(self.store.load(game_id).await?.view_for(player_id))
    }

    pub async fn games_for_player(&self, player_id: PlayerId) -> Result<Vec<GameSummary>, GameError> {
        Ok(self.store.list_for_player(player_id).await?)
    }

    /// Check turn ownership, take the game's lock, then check again against
    /// fresh state. Out-of-turn callers are refused before they queue.
    async fn begin_turn(
        &self,
        game_id: Uuid,
        player_id: PlayerId,
    ) -> Result<(GameGuard, GameState), GameError> {
        self.store.load(game_id).await?.ensure_turn(player_id)?;

        let lock = Arc::clone(&self.locks.entry(game_id).or_default());
        let guard = GameGuard {
            game_id,
            locks: Arc::clone(&self.locks),
            guard: Some(lock.lock_owned().await),
        };

        let state = self.store.load(game_id).await?;
        state.ensure_turn(player_id)?;
        Ok((guard, state))
    }

    /// Apply an accepted move to `state`: board and rack first, then score,
    /// then refill and rotate.
    fn commit_move(&self, state: &mut GameState, mover_index: usize, descriptor: &MoveDescriptor) -> ScoreResult {
        state.board.apply_placements(&descriptor.mutations);
        let result = Scorer::score_move(&state.board, descriptor);

        if let Some(mover) = state.players.get_mut(mover_index) {
            mover.rack.remove_indices(&descriptor.consumed);
            mover.score += result.score;
        }

        state.history.push(TurnRecord::Move {
            player_id: descriptor.player_id,
            positions: descriptor.positions(),
            words: result.words.clone(),
            score: result.score,
            played_at: Utc::now(),
        });

        let mut rng = self.rng();
        TurnCoordinator::after_move(state, mover_index, &mut *rng);
        state.updated_at = Utc::now();

        result
    }

    /// Save on a separate task that owns the game lock, so the write finishes
    /// even if the caller stops waiting for it.
    async fn persist(&self, state: GameState, guard: GameGuard) -> Result<GameState, GameError> {
        let store = Arc::clone(&self.store);
        let game_id = state.game_id;

        let handle = tokio::spawn(async move {
            let _guard = guard;
            store.save(&state).await.map(|_| state)
        });

        match handle.await {
            Ok(saved) => saved.map_err(|e| {
                tracing::error!("Failed to persist game {}: {}", game_id, e);
                GameError::from(e)
            }),
            Err(e) => {
                tracing::error!("Commit task for game {} aborted: {}", game_id, e);
                Err(InfrastructureError::CommitAborted(e.to_string()).into())
            }
        }
    }

    fn announce_if_finished(&self, state: &GameState) {
        if state.is_finished() {
            self.publish(GameEvent::GameOver {
                game_id: state.game_id,
                winners: state.winners(),
                final_scores: state.players.iter().map(|p| (p.id, p.score)).collect(),
            });
        }
    }

    /// Fire and forget; a failed push is logged and otherwise ignored.
    fn publish(&self, event: GameEvent) {
        if let Err(e) = self.sink.publish(&event) {
            tracing::warn!("Failed to publish event for game {}: {}", event.game_id(), e);
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
