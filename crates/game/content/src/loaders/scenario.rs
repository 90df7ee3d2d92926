//! Scenario loader.
//!
//! A scenario names the actions the player starts with and where the first
//! wave of enemies stands. Templates are referenced by name.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One enemy placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub template: String,
    pub position: (f32, f32),
}

impl Placement {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.position.0, self.position.1)
    }
}

/// Scenario structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Action template names, in selection order.
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub enemies: Vec<Placement>,
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<ScenarioSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ScenarioSpec> {
        let scenario: ScenarioSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_optional() {
        let scenario = ScenarioLoader::parse(
            r#"(enemies: [(template: "grunt", position: (12.0, -2.0))])"#,
        )
        .unwrap();
        assert!(scenario.actions.is_empty());
        assert_eq!(scenario.enemies[0].position(), Vec2::new(12.0, -2.0));
    }
}
