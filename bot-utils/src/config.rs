/*
 *     Licensed under the Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at
 *
 *         http://www.apache.org/licenses/LICENSE-2.0
 *
 *     Unless required by applicable law or agreed to in writing, software
 *     distributed under the License is distributed on an "AS IS" BASIS,
 *     WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *     See the License for the specific language governing permissions and
 *     limitations under the License.
 */


use dicemancer_roll::RollLimits;
use std::{
    convert::{TryFrom, TryInto},
    fmt::Display,
    path::{Path, PathBuf},
    time::Duration,
};
use toml::{map::Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: String,
    pub db_queue_size: usize,
    pub cache_size: usize,
    pub rng_workers: u32,
    pub rng_reseed: Duration,
    pub limits: RollLimits,
    pub command_prefix: String,
    pub allowlist_path: Option<PathBuf>,
    pub console_group: String,
}

fn integer_or<T>(config: &mut Map<String, Value>, key: &str, default: T) -> T
where
    T: TryFrom<i64> + TryInto<i64> + Copy + Display,
{
    match config
        .get(key)
        .and_then(Value::as_integer)
        .and_then(|value| T::try_from(value).ok())
    {
        Some(value) => value,
        None => {
            log::warn!("unable to read {}, overwriting with {}", key, default);
            if let Ok(value) = default.try_into() {
                config.insert(key.to_string(), Value::Integer(value));
            }
            default
        }
    }
}

fn string_or(config: &mut Map<String, Value>, key: &str, default: &str) -> String {
    match config.get(key).and_then(Value::as_str) {
        Some(value) => value.to_owned(),
        None => {
            log::warn!("unable to read {}, overwriting with {:?}", key, default);
            config.insert(key.to_string(), Value::from(default));
            default.to_owned()
        }
    }
}

impl Config {
    /// Reads the config file, fills in missing keys and writes the result back.
    ///
    /// `DB_PATH` overrides `db_path` without being persisted.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Config {
        let config_path = config_path.as_ref();
        let mut config: Map<String, Value> = match std::fs::read(config_path) {
            Ok(content) => match toml::from_slice(&content) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Unable to parse config: {}", e);
                    Map::new()
                }
            },
            Err(e) => {
                log::warn!("Unable to read config file: {}", e);
                Map::new()
            }
        };
        let mut loaded = Config::from_map(&mut config);
        match toml::to_vec(&config) {
            Ok(content) => {
                if let Err(e) = std::fs::write(config_path, content) {
                    log::warn!("Unable to write config to {:?}: {}", config_path, e)
                }
            }
            Err(e) => log::warn!("Unable to serialize config: {}", e),
        }
        if let Ok(db_path) = std::env::var("DB_PATH") {
            log::info!("using db_path {} from DB_PATH", &db_path);
            loaded.db_path = db_path;
        }
        loaded
    }

    pub fn from_map(config: &mut Map<String, Value>) -> Config {
        let allowlist_path = match config.get("allowlist_path").and_then(Value::as_str) {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                log::info!("no allowlist_path configured, every group has access");
                None
            }
        };
        Config {
            db_path: string_or(config, "db_path", "macros.db"),
            db_queue_size: integer_or(config, "db_queue_size", 64),
            cache_size: integer_or(config, "cache_size", 256),
            rng_workers: integer_or(config, "rng_workers", 4),
            rng_reseed: Duration::from_secs(integer_or(config, "rng_reseed_s", 300)),
            limits: RollLimits::new(
                integer_or(config, "max_repeats", 20),
                integer_or(config, "max_sides", 200),
            ),
            command_prefix: string_or(config, "command_prefix", "/"),
            allowlist_path,
            console_group: string_or(config, "console_group", "console"),
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::from_map(&mut Map::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_written_back() {
        let mut map = Map::new();
        let config = Config::from_map(&mut map);
        assert_eq!(config.db_path, "macros.db");
        assert_eq!(config.db_queue_size, 64);
        assert_eq!(config.cache_size, 256);
        assert_eq!(config.rng_workers, 4);
        assert_eq!(config.rng_reseed, Duration::from_secs(300));
        assert_eq!(config.limits, RollLimits::new(20, 200));
        assert_eq!(config.command_prefix, "/");
        assert_eq!(config.allowlist_path, None);
        assert_eq!(config.console_group, "console");

        assert_eq!(map.get("max_sides"), Some(&Value::Integer(200)));
        assert_eq!(map.get("command_prefix"), Some(&Value::from("/")));
        assert!(!map.contains_key("allowlist_path"));
        assert_eq!(Config::from_map(&mut map), config);
    }

    #[test]
    fn test_values_from_file() {
        let mut map: Map<String, Value> = toml::from_str(
            r#"
            db_path = "other.db"
            max_repeats = 5
            max_sides = 12
            command_prefix = "!"
            allowlist_path = "allowed_servers.json"
            "#,
        )
        .unwrap();
        let config = Config::from_map(&mut map);
        assert_eq!(config.db_path, "other.db");
        assert_eq!(config.limits, RollLimits::new(5, 12));
        assert_eq!(config.command_prefix, "!");
        assert_eq!(
            config.allowlist_path,
            Some(PathBuf::from("allowed_servers.json"))
        );
    }

    #[test]
    fn test_invalid_values_replaced() {
        let mut map: Map<String, Value> = toml::from_str(
            r#"
            max_repeats = -3
            rng_workers = "many"
            "#,
        )
        .unwrap();
        let config = Config::from_map(&mut map);
        assert_eq!(config.limits.max_repeats, Some(20));
        assert_eq!(config.rng_workers, 4);
        assert_eq!(map.get("max_repeats"), Some(&Value::Integer(20)));
        assert_eq!(map.get("rng_workers"), Some(&Value::Integer(4)));
    }
}
