//! Enemy skill table loader.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::SkillTable;

use crate::loaders::{LoadResult, read_file};

/// Named skill tables, referenced from enemy definitions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillTables {
    tables: BTreeMap<String, SkillTable>,
}

impl SkillTables {
    pub fn get(&self, name: &str) -> Option<&SkillTable> {
        self.tables.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Loader for skill tables from RON files.
pub struct SkillTableLoader;

impl SkillTableLoader {
    /// Load skill tables from a RON file.
    ///
    /// File format: `BTreeMap<String, Vec<SkillEntry>>`. Entry order is kept
    /// because it decides ties during weighted draws.
    ///
    /// ```ron
    /// {
    ///     "skirmisher": [
    ///         (kind: Move, weight: 3, cap: Some(2)),
    ///         (kind: Strike, weight: 2),
    ///     ],
    /// }
    /// ```
    pub fn load(path: &Path) -> LoadResult<SkillTables> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SkillTables> {
        let tables: BTreeMap<String, SkillTable> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill table RON: {}", e))?;

        for (name, table) in &tables {
            table
                .validate()
                .map_err(|e| anyhow::anyhow!("Skill table '{}': {}", name, e))?;
        }

        Ok(SkillTables { tables })
    }
}
