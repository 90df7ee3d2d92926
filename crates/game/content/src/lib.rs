//! Data-driven battle content and loaders.
//!
//! This crate turns RON/TOML data files into battle-core values:
//! - Simulation tuning (`config.toml`, TOML)
//! - Named enemy skill tables (`skills.ron`)
//! - Enemy templates referencing those tables (`enemies.ron`)
//! - Player action templates (`actions.ron`)
//! - Scenarios placing actions and enemies (`scenario.ron`)
//!
//! [`ContentFactory`] ties them together into a ready
//! [`battle_core::Simulation`].

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActionLoader, ConfigLoader, ContentFactory, EnemyLoader, EnemySpec, Placement, ScenarioLoader,
    ScenarioSpec, SkillTableLoader, SkillTables,
};

/// Directory holding the bundled sample content.
pub fn bundled_data_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}
