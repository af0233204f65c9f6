use rand::Rng;

use crate::models::{GameState, GameStatus};

/// Turn rotation, rack replenishment and end-of-game detection.
pub struct TurnCoordinator;

impl TurnCoordinator {
    /// Finish a committed move: top up the mover's rack, pass the turn on and
    /// close the game if it just ran out. Returns how many tiles were drawn.
    pub fn after_move(state: &mut GameState, mover_index: usize, rng: &mut impl Rng) -> usize {
        let drawn = match state.players.get_mut(mover_index) {
            Some(mover) => mover.rack.refill(&mut state.bag, rng),
            None => 0,
        };
        Self::advance(state);
        drawn
    }

    /// An explicit pass: rotate with no draw and no score.
    pub fn after_pass(state: &mut GameState) {
        Self::advance(state);
    }

    /// The bag is empty and at least one rack has been played out.
    pub fn is_finished(state: &GameState) -> bool {
        state.bag.is_empty() && state.players.iter().any(|p| p.rack.is_empty())
    }

    fn advance(state: &mut GameState) {
        if !state.players.is_empty() {
            state.current_player_index = (state.current_player_index + 1) % state.players.len();
        }
        if state.status == GameStatus::InProgress && Self::is_finished(state) {
            state.status = GameStatus::Finished;
            tracing::info!("Game {} finished", state.game_id);
        }
    }
}
