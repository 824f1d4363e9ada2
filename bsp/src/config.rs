use super::errors::{ErrorKind, Result};
use failchain::{ensure, ResultExt};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const DEFAULT_SPLIT_COST_FACTOR: i32 = 7;
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 1024;
pub const DEFAULT_SUPERBLOCK_LEAF_SIZE: f64 = 256.0;

/// Tuning knobs for a single build.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// How many units of left/right imbalance one split is worth.
    pub split_cost_factor: i32,
    pub max_recursion_depth: usize,
    /// On equal cost, prefer partitions lying on two-sided lines.
    pub prefer_two_sided_partitions: bool,
    /// Superblocks stop subdividing once both sides are at most this long.
    pub superblock_leaf_size: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            split_cost_factor: DEFAULT_SPLIT_COST_FACTOR,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            prefer_two_sided_partitions: true,
            superblock_leaf_size: DEFAULT_SUPERBLOCK_LEAF_SIZE,
        }
    }
}

impl BuildConfig {
    pub fn from_file<P: AsRef<Path>>(path: &P) -> Result<BuildConfig> {
        let path = path.as_ref().to_string_lossy().into_owned();
        let mut contents = String::new();
        File::open(&path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .chain_err(ErrorKind::on_config_read(&path))?;
        BuildConfig::from_text(&contents)
    }

    pub fn from_text(contents: &str) -> Result<BuildConfig> {
        let config: BuildConfig =
            toml::from_str(contents).chain_err(ErrorKind::on_config_parse)?;
        config.check()?;
        Ok(config)
    }

    pub fn with_split_cost_factor(mut self, split_cost_factor: i32) -> Self {
        self.split_cost_factor = split_cost_factor;
        self
    }

    fn check(&self) -> Result<()> {
        ensure!(
            self.split_cost_factor >= 0,
            ErrorKind::CorruptConfig {
                message: format!(
                    "split_cost_factor must not be negative, got {}.",
                    self.split_cost_factor
                ),
            }
        );
        ensure!(
            self.superblock_leaf_size > 0.0,
            ErrorKind::CorruptConfig {
                message: format!(
                    "superblock_leaf_size must be positive, got {}.",
                    self.superblock_leaf_size
                ),
            }
        );
        Ok(())
    }
}
