//! Enemy template loader.
//!
//! Enemy definitions name their skill table instead of repeating it; the
//! loader resolves those names against [`SkillTables`].

use std::path::Path;

use battle_core::{EnemyProfile, EnemyTemplate, SimConfig};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, SkillTables, read_file};

/// Enemy definition as written in `enemies.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub name: String,
    pub hp: i32,
    pub energy_budget: u32,
    /// Name of an entry in `skills.ron`.
    pub skills: String,
    #[serde(default)]
    pub profile: EnemyProfile,
    #[serde(default)]
    pub score: Option<u64>,
}

/// Loader for enemy templates from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load enemy templates from a RON file.
    ///
    /// RON format: `Vec<EnemySpec>`
    pub fn load(path: &Path, tables: &SkillTables) -> LoadResult<Vec<EnemyTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content, tables)
    }

    pub fn parse(content: &str, tables: &SkillTables) -> LoadResult<Vec<EnemyTemplate>> {
        let specs: Vec<EnemySpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON: {}", e))?;

        let mut templates = Vec::with_capacity(specs.len());
        for spec in specs {
            if templates.iter().any(|t: &EnemyTemplate| t.name == spec.name) {
                anyhow::bail!("Enemy '{}' is defined more than once", spec.name);
            }
            templates.push(Self::resolve(spec, tables)?);
        }

        // Spawn targets may point at any template in the same file.
        for template in &templates {
            if let Some(child) = &template.profile.spawn_template
                && !templates.iter().any(|t| &t.name == child)
            {
                anyhow::bail!(
                    "Enemy '{}' spawns unknown template '{}'",
                    template.name,
                    child
                );
            }
        }

        Ok(templates)
    }

    fn resolve(spec: EnemySpec, tables: &SkillTables) -> LoadResult<EnemyTemplate> {
        if spec.energy_budget > SimConfig::MAX_SKILL_BUDGET {
            anyhow::bail!(
                "Enemy '{}' has energy budget {} (max {})",
                spec.name,
                spec.energy_budget,
                SimConfig::MAX_SKILL_BUDGET
            );
        }

        let skills = tables.get(&spec.skills).cloned().ok_or_else(|| {
            anyhow::anyhow!(
                "Failed to resolve skill table '{}' for enemy '{}' (known: {})",
                spec.skills,
                spec.name,
                tables.names().collect::<Vec<_>>().join(", ")
            )
        })?;

        let mut template = EnemyTemplate::new(spec.name, spec.hp, spec.energy_budget, skills)
            .with_profile(spec.profile);
        if let Some(score) = spec.score {
            template = template.with_score(score);
        }
        Ok(template)
    }
}
