//! Player action template loader.

use std::path::Path;

use battle_core::{ActionTemplate, Capabilities};

use crate::loaders::{LoadResult, read_file};

/// Loader for player action templates from RON files.
pub struct ActionLoader;

impl ActionLoader {
    /// Load action templates from a RON file.
    ///
    /// RON format: `Vec<ActionTemplate>`
    pub fn load(path: &Path) -> LoadResult<Vec<ActionTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ActionTemplate>> {
        let templates: Vec<ActionTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse action catalog RON: {}", e))?;

        for (i, template) in templates.iter().enumerate() {
            if templates[..i].iter().any(|t| t.name == template.name) {
                anyhow::bail!("Action '{}' is defined more than once", template.name);
            }

            if !template.capabilities().contains(Capabilities::THROW_FORCE) {
                anyhow::bail!("Action '{}' must declare THROW_FORCE", template.name);
            }
            if !(template.projectile_speed.is_finite() && template.projectile_speed > 0.0) {
                anyhow::bail!(
                    "Action '{}' has non-positive projectile_speed {}",
                    template.name,
                    template.projectile_speed
                );
            }
        }

        Ok(templates)
    }
}
