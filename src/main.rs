use std::sync::Arc;

use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use word_place_engine::{
    config::Config,
    db::{self, PgGameStore},
    BroadcastSink, Dictionary, GameEngine, GameEvent, MemoryStore, PersistenceStore, Placement,
    PlayerId,
};

/// One line of console input
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Show,
    Quit,
    Pass(PlayerId),
    Play(PlayerId, Vec<Placement>),
}

fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        bail!("empty command");
    };

    match first {
        "show" => return Ok(Command::Show),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    let player: PlayerId = first
        .parse()
        .with_context(|| format!("'{}' is not a player id", first))?;
    let rest: Vec<&str> = words.collect();

    match rest.as_slice() {
        ["pass"] => Ok(Command::Pass(player)),
        [] => bail!("expected 'pass' or placements after player {}", player),
        placements => Ok(Command::Play(player, Placement::parse_all(placements)?)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "word_place_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let store: Arc<dyn PersistenceStore> = match &config.database {
        Some(database) => {
            let pool = db::create_pool(&database.url, database.max_connections).await?;
            tracing::info!("Connected to database");
            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations completed");
            Arc::new(PgGameStore::new(pool))
        }
        None => {
            tracing::info!("DATABASE_URL not set, keeping games in memory");
            Arc::new(MemoryStore::new())
        }
    };

    // Load dictionary
    let dictionary = match Dictionary::load(&config.game.dictionary_path).await {
        Ok(dict) => dict,
        Err(e) => {
            tracing::warn!("Failed to load dictionary: {}. Using empty dictionary.", e);
            tracing::warn!(
                "Put a word list at {} to accept any moves",
                config.game.dictionary_path
            );
            Dictionary::empty()
        }
    };

    let rng = match config.game.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let sink = BroadcastSink::new(64);
    let mut events = sink.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            log_event(&event);
        }
    });

    let engine = GameEngine::new(store, Arc::new(dictionary), Arc::new(sink), rng)
        .with_max_players(config.game.max_players);

    let game = engine.create_game(&config.game.player_ids).await?;
    println!("Game {} started", game.game_id);
    show(&engine, game.game_id).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{:#}", e);
                continue;
            }
        };

        let outcome = match command {
            Command::Quit => break,
            Command::Show => Ok(()),
            Command::Pass(player) => engine.pass_turn(game.game_id, player).await,
            Command::Play(player, placements) => engine
                .submit_move(game.game_id, player, &placements)
                .await
                .map(|result| {
                    for word in &result.words {
                        println!("  {} for {}", word.word, word.score);
                    }
                    println!("Player {} scored {}", player, result.score);
                }),
        };

        if let Err(e) = outcome {
            println!("{}", e);
            continue;
        }

        show(&engine, game.game_id).await?;
        if engine.get_state(game.game_id).await?.is_finished() {
            break;
        }
    }

    Ok(())
}

async fn show(engine: &GameEngine, game_id: Uuid) -> Result<()> {
    let state = engine.get_state(game_id).await?;
    println!("{}", state.board);

    for player in &state.players {
        let racked: String = player.rack.tiles().iter().collect();
        println!("Player {:>4}: {:>4} points  [{}]", player.id, player.score, racked);
    }
    println!("{} tiles in the bag, status {}", state.bag.len(), state.status);

    match state.current_player() {
        Some(current) if !state.is_finished() => println!("Player {} to move", current.id),
        _ => println!("Winners: {:?}", state.winners()),
    }
    Ok(())
}

fn log_event(event: &GameEvent) {
    match serde_json::to_string(event) {
        Ok(json) => tracing::debug!("Event: {}", json),
        Err(e) => tracing::warn!("Failed to serialize event for game {}: {}", event.game_id(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_play() {
        assert_eq!(
            parse_command("2 7:7:0 8:7:3").unwrap(),
            Command::Play(2, vec![Placement::new(7, 7, 0), Placement::new(8, 7, 3)])
        );
    }

    #[test]
    fn test_parse_pass_and_keywords() {
        assert_eq!(parse_command("  5 pass ").unwrap(), Command::Pass(5));
        assert_eq!(parse_command("show").unwrap(), Command::Show);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_command("").is_err());
        assert!(parse_command("alice pass").is_err());
        assert!(parse_command("1").is_err());
        assert!(parse_command("1 7:7").is_err());
    }
}
