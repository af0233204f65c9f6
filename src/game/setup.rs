use std::collections::HashSet;

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::{
    error::SetupError,
    game::{Board, TileBag, TurnCoordinator, RACK_CAPACITY},
    models::{GameState, GameStatus, Player, PlayerId},
    utils::letters::STANDARD_TILE_COUNT,
};

/// Most players a full bag can deal a complete rack to
pub const MAX_SEATS: usize = STANDARD_TILE_COUNT / RACK_CAPACITY;

/// Lay out a new game: board, filled bag, dealt racks and a random first
/// player. The game comes back `InProgress`, or `Finished` when dealing
/// emptied the bag and left a rack empty.
pub fn new_game(
    game_id: Uuid,
    player_ids: &[PlayerId],
    board: Board,
    bag: TileBag,
    max_players: usize,
    rng: &mut impl Rng,
) -> Result<GameState, SetupError> {
    if player_ids.is_empty() {
        return Err(SetupError::NoPlayers);
    }

    let max = max_players.min(MAX_SEATS);
    if player_ids.len() > max {
        return Err(SetupError::TooManyPlayers {
            requested: player_ids.len(),
            max,
        });
    }

    let mut seen = HashSet::new();
    if let Some(&dup) = player_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(SetupError::DuplicatePlayer(dup));
    }

    let now = Utc::now();
    let mut state = GameState {
        game_id,
        board,
        bag,
        players: player_ids.iter().map(|&id| Player::new(id)).collect(),
        current_player_index: 0,
        status: GameStatus::Setup,
        history: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    for player in &mut state.players {
        player.rack.refill(&mut state.bag, rng);
    }
    state.current_player_index = rng.random_range(0..state.players.len());
    state.status = GameStatus::InProgress;

    // A short custom bag can run dry while dealing
    if TurnCoordinator::is_finished(&state) {
        state.status = GameStatus::Finished;
        tracing::info!("Game {} has no tiles left to play, finished at setup", game_id);
    }

    tracing::info!(
        "Created game {} for {} players, player {} starts",
        game_id,
        player_ids.len(),
        player_ids[state.current_player_index]
    );

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn create(players: &[PlayerId], seed: u64) -> Result<GameState, SetupError> {
        let mut rng = StdRng::seed_from_u64(seed);
        new_game(Uuid::new_v4(), players, Board::standard(), TileBag::standard(), 4, &mut rng)
    }

    #[test]
    fn test_new_game_deals_racks() {
        let state = create(&[1, 2], 5).unwrap();
        assert_eq!(state.status, GameStatus::InProgress);
        assert_eq!(state.board.size(), 15);
        assert_eq!(state.bag.len(), 84);
        assert!(state.players.iter().all(|p| p.rack.len() == 8 && p.score == 0));
        assert!(state.current_player_index < 2);
        assert_eq!(state.tile_count(), 100);
    }

    #[test]
    fn test_new_game_is_reproducible() {
        let a = create(&[1, 2, 3], 11).unwrap();
        let b = create(&[1, 2, 3], 11).unwrap();
        assert_eq!(a.players, b.players);
        assert_eq!(a.bag, b.bag);
        assert_eq!(a.current_player_index, b.current_player_index);
    }

    #[test]
    fn test_starting_player_varies_with_seed() {
        let starters: HashSet<usize> = (0..32)
            .map(|seed| create(&[1, 2, 3, 4], seed).unwrap().current_player_index)
            .collect();
        assert!(starters.len() > 1);
    }

    #[test]
    fn test_rejects_bad_player_lists() {
        assert_eq!(create(&[], 1).unwrap_err(), SetupError::NoPlayers);
        assert_eq!(create(&[1, 2, 1], 1).unwrap_err(), SetupError::DuplicatePlayer(1));
        assert_eq!(
            create(&[1, 2, 3, 4, 5], 1).unwrap_err(),
            SetupError::TooManyPlayers { requested: 5, max: 4 }
        );
    }

    #[test]
    fn test_short_bag_finishes_at_setup() {
        let mut rng = StdRng::seed_from_u64(3);
        let state = new_game(
            Uuid::new_v4(),
            &[1, 2, 3],
            Board::standard(),
            TileBag::from_tiles("AB".chars()),
            4,
            &mut rng,
        )
        .unwrap();
        assert_eq!(state.status, GameStatus::Finished);
        assert_eq!(state.players[0].rack.len(), 2);
        assert!(state.players[1].rack.is_empty());
        assert!(state.bag.is_empty());
    }

    #[test]
    fn test_exact_bag_still_starts() {
        let mut rng = StdRng::seed_from_u64(3);
        let state = new_game(
            Uuid::new_v4(),
            &[1, 2],
            Board::standard(),
            TileBag::from_tiles("ABCDEFGHIJKLMNOP".chars()),
            4,
            &mut rng,
        )
        .unwrap();
        assert!(state.bag.is_empty());
        assert_eq!(state.status, GameStatus::InProgress);
    }

    #[test]
    fn test_seat_cap_follows_bag_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let players: Vec<PlayerId> = (0..13).collect();
        let err = new_game(Uuid::new_v4(), &players, Board::standard(), TileBag::standard(), 50, &mut rng)
            .unwrap_err();
        assert_eq!(err, SetupError::TooManyPlayers { requested: 13, max: MAX_SEATS });
    }
}
