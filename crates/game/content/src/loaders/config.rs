//! Simulation configuration loader.

use std::path::Path;

use battle_core::SimConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for simulation configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their [`SimConfig::new`] defaults. The result is
    /// validated before it is returned.
    pub fn load(path: &Path) -> LoadResult<SimConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SimConfig> {
        let config: SimConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = ConfigLoader::parse("seed = 7\nsettle_delay = 0.0\n").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.settle_delay, 0.0);
        assert_eq!(config.rescan_delay, SimConfig::DEFAULT_RESCAN_DELAY);
        assert_eq!(config.max_enemies, SimConfig::DEFAULT_MAX_ENEMIES);
    }

    #[test]
    fn negative_delays_are_rejected() {
        let err = ConfigLoader::parse("skill_pacing = -1.0").unwrap_err();
        assert!(err.to_string().contains("skill_pacing"), "{err}");
    }
}
