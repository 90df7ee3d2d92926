//! Client configuration loaded from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration required to bootstrap the headless client.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Directory holding `skills.ron`, `enemies.ron`, `actions.ron`,
    /// `scenario.ron` and an optional `config.toml`.
    pub content_dir: PathBuf,
    pub cycles: u32,
    /// Simulated time per step.
    pub tick: Duration,
    /// Overrides the seed from `config.toml`.
    pub seed: Option<u64>,
    /// Directory for the log file. `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            content_dir: battle_content::bundled_data_dir(),
            cycles: 3,
            tick: Duration::from_millis(50),
            seed: None,
            log_dir: default_log_dir(),
        }
    }
}

impl ClientConfig {
    /// Upper bound on steps per battle before a cycle is abandoned.
    pub const MAX_TICKS_PER_CYCLE: usize = 20_000;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_CONTENT_DIR` - Content directory (default: bundled sample data)
    /// - `BATTLE_CYCLES` - Cycles to play (default: 3)
    /// - `BATTLE_TICK_MS` - Simulated milliseconds per step (default: 50)
    /// - `BATTLE_SEED` - Seed override (default: from `config.toml`)
    /// - `BATTLE_LOG_DIR` - Log directory; `off` disables the log file
    ///   (default: platform cache directory)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("BATTLE_CONTENT_DIR").filter(|v| !v.is_empty()) {
            config.content_dir = PathBuf::from(dir);
        }

        if let Some(cycles) = read::<u32>(&lookup, "BATTLE_CYCLES") {
            config.cycles = cycles;
        }

        if let Some(ms) = read::<u64>(&lookup, "BATTLE_TICK_MS") {
            config.tick = Duration::from_millis(ms.max(1));
        }

        config.seed = read::<u64>(&lookup, "BATTLE_SEED");

        match lookup("BATTLE_LOG_DIR").as_deref() {
            Some("off") => config.log_dir = None,
            Some(dir) if !dir.is_empty() => config.log_dir = Some(PathBuf::from(dir)),
            _ => {}
        }

        config
    }

    /// Step size in simulated seconds.
    pub fn dt(&self) -> f32 {
        self.tick.as_secs_f32()
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

/// Get the platform-specific log directory
fn default_log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "battle").map(|dirs| dirs.cache_dir().join("logs"))
}
