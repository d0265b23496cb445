//! Engine settings loaded from the environment.
//!
//! `main` loads `.env` first (via dotenvy), so every key can live there.
//! Unparseable numbers fall back to the default with a warning rather than
//! aborting startup.

use std::path::PathBuf;
use std::str::FromStr;

use daytalk_domain::{DEFAULT_END_DAY, DEFAULT_MAX_TURNS};

use crate::infrastructure::npc_proxy::{DEFAULT_PROXY_TIMEOUT_SECS, DEFAULT_PROXY_URL};

pub const ENV_PROXY_URL: &str = "DAYTALK_PROXY_URL";
pub const ENV_PROXY_TIMEOUT_SECS: &str = "DAYTALK_PROXY_TIMEOUT_SECS";
pub const ENV_SAVE_ROOT: &str = "DAYTALK_SAVE_ROOT";
pub const ENV_SAVE_SLOT: &str = "DAYTALK_SAVE_SLOT";
pub const ENV_START_DAY: &str = "DAYTALK_START_DAY";
pub const ENV_END_DAY: &str = "DAYTALK_END_DAY";
pub const ENV_MAX_TURNS: &str = "DAYTALK_MAX_TURNS";
pub const ENV_NPC_CATALOG: &str = "DAYTALK_NPC_CATALOG";
pub const ENV_SERVER_HOST: &str = "SERVER_HOST";
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub proxy_url: String,
    pub proxy_timeout_secs: u64,
    pub save_root: PathBuf,
    pub save_slot: u32,
    pub start_day: u32,
    pub end_day: u32,
    /// Recent turns kept per NPC
    pub max_turns: usize,
    /// Optional JSON file with NPC definitions; built-ins are used otherwise
    pub npc_catalog_path: Option<PathBuf>,
    pub server_host: String,
    pub server_port: u16,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            proxy_timeout_secs: DEFAULT_PROXY_TIMEOUT_SECS,
            save_root: PathBuf::from("data"),
            save_slot: 1,
            start_day: 1,
            end_day: DEFAULT_END_DAY,
            max_turns: DEFAULT_MAX_TURNS,
            npc_catalog_path: None,
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
        }
    }
}

impl EngineSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            proxy_url: text(ENV_PROXY_URL).unwrap_or(defaults.proxy_url),
            proxy_timeout_secs: parse_or(
                ENV_PROXY_TIMEOUT_SECS,
                text(ENV_PROXY_TIMEOUT_SECS),
                defaults.proxy_timeout_secs,
            ),
            save_root: text(ENV_SAVE_ROOT)
                .map(PathBuf::from)
                .unwrap_or(defaults.save_root),
            save_slot: parse_or(ENV_SAVE_SLOT, text(ENV_SAVE_SLOT), defaults.save_slot),
            start_day: parse_or(ENV_START_DAY, text(ENV_START_DAY), defaults.start_day),
            end_day: parse_or(ENV_END_DAY, text(ENV_END_DAY), defaults.end_day),
            max_turns: at_least_one(
                ENV_MAX_TURNS,
                parse_or(ENV_MAX_TURNS, text(ENV_MAX_TURNS), defaults.max_turns),
            ),
            npc_catalog_path: text(ENV_NPC_CATALOG).map(PathBuf::from),
            server_host: text(ENV_SERVER_HOST).unwrap_or(defaults.server_host),
            server_port: parse_or(ENV_SERVER_PORT, text(ENV_SERVER_PORT), defaults.server_port),
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Invalid setting, using default");
            default
        }),
    }
}

/// A zero history limit would drop the player line of the turn in progress.
fn at_least_one(key: &str, value: usize) -> usize {
    if value == 0 {
        tracing::warn!(key, "Setting must be at least 1, using 1");
        return 1;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> EngineSettings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(settings_from(&[]), EngineSettings::default());
    }

    #[test]
    fn values_are_read_from_lookup() {
        let settings = settings_from(&[
            (ENV_PROXY_URL, "http://proxy:9000/talk"),
            (ENV_SAVE_SLOT, "2"),
            (ENV_END_DAY, "14"),
            (ENV_MAX_TURNS, "6"),
            (ENV_NPC_CATALOG, "npcs/catalog.json"),
            (ENV_SERVER_PORT, "8080"),
        ]);

        assert_eq!(settings.proxy_url, "http://proxy:9000/talk");
        assert_eq!(settings.save_slot, 2);
        assert_eq!(settings.end_day, 14);
        assert_eq!(settings.max_turns, 6);
        assert_eq!(
            settings.npc_catalog_path,
            Some(PathBuf::from("npcs/catalog.json"))
        );
        assert_eq!(settings.server_port, 8080);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let settings = settings_from(&[(ENV_END_DAY, "thirty"), (ENV_SERVER_PORT, "")]);
        assert_eq!(settings.end_day, DEFAULT_END_DAY);
        assert_eq!(settings.server_port, 3000);
    }

    #[test]
    fn zero_max_turns_is_raised_to_one() {
        assert_eq!(settings_from(&[(ENV_MAX_TURNS, "0")]).max_turns, 1);
        assert_eq!(settings_from(&[(ENV_MAX_TURNS, "1")]).max_turns, 1);
    }
}
