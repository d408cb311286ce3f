use crate::core::forcefield::params::{Forcefield, ParamLoadError};
use crate::core::forcefield::scoring::ScoringConfig;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PROMOTION_THRESHOLD: u64 = 5;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Where the forcefield parameters come from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ForcefieldSource {
    #[default]
    Builtin,
    Files {
        non_bonded_path: PathBuf,
        charges_path: PathBuf,
    },
}

impl ForcefieldSource {
    pub fn load(&self) -> Result<Forcefield, ParamLoadError> {
        match self {
            Self::Builtin => Ok(Forcefield::builtin()),
            Self::Files {
                non_bonded_path,
                charges_path,
            } => Forcefield::load(non_bonded_path, charges_path),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    /// Request count at which a build record is promoted to a stored model.
    pub promotion_threshold: u64,
    pub scoring: ScoringConfig,
    pub forcefield: ForcefieldSource,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            promotion_threshold: DEFAULT_PROMOTION_THRESHOLD,
            scoring: ScoringConfig::default(),
            forcefield: ForcefieldSource::default(),
        }
    }
}

impl BuildConfig {
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct BuildConfigBuilder {
    promotion_threshold: Option<u64>,
    cutoff: Option<f64>,
    adjacent_residue_exclusion: Option<usize>,
    forcefield: Option<ForcefieldSource>,
}

impl BuildConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn promotion_threshold(mut self, threshold: u64) -> Self {
        self.promotion_threshold = Some(threshold);
        self
    }
    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn adjacent_residue_exclusion(mut self, residues: usize) -> Self {
        self.adjacent_residue_exclusion = Some(residues);
        self
    }
    pub fn forcefield(mut self, source: ForcefieldSource) -> Self {
        self.forcefield = Some(source);
        self
    }

    pub fn build(self) -> Result<BuildConfig, ConfigError> {
        let defaults = BuildConfig::default();

        let promotion_threshold = self
            .promotion_threshold
            .unwrap_or(defaults.promotion_threshold);
        if promotion_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                field: "promotion_threshold",
                reason: "must be at least 1".to_string(),
            });
        }

        let cutoff = self.cutoff.unwrap_or(defaults.scoring.cutoff);
        if !(cutoff.is_finite() && cutoff > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "cutoff",
                reason: format!("must be a positive distance in Angstroms (got {cutoff})"),
            });
        }

        Ok(BuildConfig {
            promotion_threshold,
            scoring: ScoringConfig {
                cutoff,
                adjacent_residue_exclusion: self
                    .adjacent_residue_exclusion
                    .unwrap_or(defaults.scoring.adjacent_residue_exclusion),
            },
            forcefield: self.forcefield.unwrap_or(defaults.forcefield),
        })
    }
}
