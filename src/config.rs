use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

use crate::models::PlayerId;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Absent when games should be kept in memory only
    pub database: Option<DatabaseConfig>,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub dictionary_path: String,
    pub max_players: usize,
    /// Fixed seed for reproducible tile draws and starting players
    pub rng_seed: Option<u64>,
    /// Seats for the console driver
    pub player_ids: Vec<PlayerId>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dictionary_path: "./dictionary.txt".to_string(),
            max_players: 4,
            rng_seed: None,
            player_ids: vec![1, 2],
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database = match env::var("DATABASE_URL") {
            Ok(url) => Some(DatabaseConfig {
                url,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("DATABASE_MAX_CONNECTIONS must be a number")?,
            }),
            Err(_) => None,
        };

        let defaults = GameConfig::default();
        let game = GameConfig {
            dictionary_path: env::var("DICTIONARY_PATH")
                .unwrap_or(defaults.dictionary_path),
            max_players: env::var("MAX_PLAYERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(defaults.max_players),
            rng_seed: env::var("RNG_SEED")
                .ok()
                .map(|seed| seed.parse().context("RNG_SEED must be an unsigned integer"))
                .transpose()?,
            player_ids: match env::var("PLAYER_IDS") {
                Ok(ids) => parse_player_ids(&ids)?,
                Err(_) => defaults.player_ids,
            },
        };

        Ok(Config { database, game })
    }
}

/// Parse a comma separated list such as `"1, 2, 3"`
pub fn parse_player_ids(raw: &str) -> Result<Vec<PlayerId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<PlayerId>()
                .with_context(|| format!("PLAYER_IDS entry '{}' is not a number", id))
        })
        .collect()
}
