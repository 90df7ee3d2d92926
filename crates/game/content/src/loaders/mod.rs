//! Content loaders for reading battle data from files.
//!
//! Each loader reads one file and returns battle-core types. Cross-file
//! references (enemy → skill table, scenario → templates) are resolved by
//! name and reported as load errors when missing.

pub mod actions;
pub mod config;
pub mod enemies;
pub mod factory;
pub mod scenario;
pub mod skills;

pub use actions::ActionLoader;
pub use config::ConfigLoader;
pub use enemies::{EnemyLoader, EnemySpec};
pub use factory::ContentFactory;
pub use scenario::{Placement, ScenarioLoader, ScenarioSpec};
pub use skills::{SkillTableLoader, SkillTables};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
