//! Save/load persistence
//!
//! Features:
//! - Key-value [`SaveStore`] boundary (memory or one JSON file per key)
//! - Missing or corrupt keys fall back to defaults instead of failing
//! - [`SaveData`]: highscore, run history, banked coins and audio levels

pub mod store;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use store::{JsonDirStore, MemoryStore, SaveStore};

use crate::error::PersistenceError;
use crate::highscores::RunHistory;
use crate::settings::AudioSettings;

const KEYS: [&str; 6] = [
    "highscore",
    "run_history",
    "coins",
    "music_volume",
    "sfx_volume",
    "muted",
];

/// Everything that survives between sessions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SaveData {
    /// Best distance ever reached
    pub highscore: u64,
    pub history: RunHistory,
    /// Banked coins (spent in the shop)
    pub coins: u64,
    pub audio: AudioSettings,
}

impl SaveData {
    /// Load from `store`; any missing or malformed key keeps its default
    pub fn load(store: &impl SaveStore) -> Self {
        let defaults = Self::default();
        let values = store.load(&KEYS, &defaults.values());
        let mut data = defaults.clone();
        if let [highscore, history, coins, music, sfx, muted] = values.as_slice() {
            data.highscore = decode("highscore", highscore, defaults.highscore);
            data.history = decode("run_history", history, defaults.history.clone());
            data.coins = decode("coins", coins, defaults.coins);
            data.audio.music_volume = decode("music_volume", music, defaults.audio.music_volume);
            data.audio.sfx_volume = decode("sfx_volume", sfx, defaults.audio.sfx_volume);
            data.audio.muted = decode("muted", muted, defaults.audio.muted);
        }
        log::info!(
            "Loaded save: highscore {}, {} runs, {} coins",
            data.highscore,
            data.history.len(),
            data.coins
        );
        data
    }

    /// Write every key
    pub fn save(&self, store: &mut impl SaveStore) -> Result<(), PersistenceError> {
        store.save(&KEYS, &self.values())?;
        log::info!("Save written");
        Ok(())
    }

    /// Fold a finished run in. Returns true on a new highscore.
    pub fn record_run(&mut self, distance: f32, coins: u64) -> bool {
        let distance = distance.max(0.0) as u64;
        let run = self.history.record(distance, coins);
        self.coins += coins;
        if distance > self.highscore {
            log::info!("Run {}: new highscore {}", run, distance);
            self.highscore = distance;
            true
        } else {
            false
        }
    }

    fn values(&self) -> [Value; 6] {
        [
            encode(&self.highscore),
            encode(&self.history),
            encode(&self.coins),
            encode(&self.audio.music_volume),
            encode(&self.audio.sfx_volume),
            encode(&self.audio.muted),
        ]
    }
}

fn encode<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn decode<T: DeserializeOwned>(key: &str, value: &Value, default: T) -> T {
    match serde_json::from_value(value.clone()) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Ignoring malformed save key `{}`: {}", key, e);
            default
        }
    }
}
