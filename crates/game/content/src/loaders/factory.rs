//! Content factory for building simulations from data files.

use std::path::{Path, PathBuf};

use battle_core::{ActionTemplate, EnemyTemplate, SimConfig, Simulation};

use crate::loaders::{
    ActionLoader, ConfigLoader, EnemyLoader, LoadResult, ScenarioLoader, ScenarioSpec,
    SkillTableLoader, SkillTables,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml     (optional)
/// ├── skills.ron
/// ├── enemies.ron
/// ├── actions.ron
/// └── scenario.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Loads every file in `data_dir` and returns a simulation in Prepare
    /// with the scenario's actions and enemies registered.
    pub fn build_simulation(data_dir: impl Into<PathBuf>) -> LoadResult<Simulation> {
        let factory = Self::new(data_dir);
        let config = factory.load_config()?;
        factory.build(config)
    }

    /// Like [`Self::build_simulation`] but with a caller-provided config.
    pub fn build(&self, config: SimConfig) -> LoadResult<Simulation> {
        let enemies = self.load_enemies()?;
        let actions = self.load_actions()?;
        let scenario = self.load_scenario()?;

        let mut sim = Simulation::new(config)
            .map_err(|e| anyhow::anyhow!("Invalid simulation config: {}", e))?;
        for template in &enemies {
            sim.register_enemy_template(template.clone());
        }

        for name in &scenario.actions {
            let template = actions
                .iter()
                .find(|t| &t.name == name)
                .ok_or_else(|| anyhow::anyhow!("Scenario references unknown action '{}'", name))?;
            sim.add_action(template.clone());
        }

        for placement in &scenario.enemies {
            sim.spawn_enemy(&placement.template, placement.position())
                .map_err(|e| anyhow::anyhow!("Failed to place '{}': {}", placement.template, e))?;
        }

        tracing::info!(
            target: "battle::content",
            data_dir = %self.data_dir.display(),
            actions = scenario.actions.len(),
            enemies = scenario.enemies.len(),
            templates = enemies.len(),
            "content loaded"
        );

        Ok(sim)
    }

    /// Load simulation configuration from `config.toml`, or the defaults
    /// when the file is absent.
    pub fn load_config(&self) -> LoadResult<SimConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(target: "battle::content", path = %path.display(), "no config file, using defaults");
            return Ok(SimConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load skill tables from `skills.ron`.
    pub fn load_skill_tables(&self) -> LoadResult<SkillTables> {
        let path = self.data_dir.join("skills.ron");
        SkillTableLoader::load(&path)
    }

    /// Load enemy templates from `enemies.ron`, resolving their skill tables.
    pub fn load_enemies(&self) -> LoadResult<Vec<EnemyTemplate>> {
        let tables = self.load_skill_tables()?;
        let path = self.data_dir.join("enemies.ron");
        EnemyLoader::load(&path, &tables)
    }

    /// Load action templates from `actions.ron`.
    pub fn load_actions(&self) -> LoadResult<Vec<ActionTemplate>> {
        let path = self.data_dir.join("actions.ron");
        ActionLoader::load(&path)
    }

    /// Load the scenario from `scenario.ron`.
    pub fn load_scenario(&self) -> LoadResult<ScenarioSpec> {
        let path = self.data_dir.join("scenario.ron");
        ScenarioLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
