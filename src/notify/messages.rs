use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{PlayerId, WordScore};

/// State changes pushed to observers after a successful commit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameCreated {
        game_id: Uuid,
        players: Vec<PlayerId>,
        current_player: PlayerId,
    },
    MovePlayed {
        game_id: Uuid,
        player_id: PlayerId,
        score: u32,
        words: Vec<WordScore>,
        next_player: PlayerId,
    },
    TurnPassed {
        game_id: Uuid,
        player_id: PlayerId,
        next_player: PlayerId,
    },
    GameOver {
        game_id: Uuid,
        winners: Vec<PlayerId>,
        final_scores: Vec<(PlayerId, u32)>,
    },
}

impl GameEvent {
    pub fn game_id(&self) -> Uuid {
        match self {
            GameEvent::GameCreated { game_id, .. }
            | GameEvent::MovePlayed { game_id, .. }
            | GameEvent::TurnPassed { game_id, .. }
            | GameEvent::GameOver { game_id, .. } => *game_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let game_id = Uuid::nil();
        let event = GameEvent::TurnPassed {
            game_id,
            player_id: 1,
            next_player: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "turn_passed");
        assert_eq!(json["next_player"], 2);
        assert_eq!(event.game_id(), game_id);
    }
}
