use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use ccbuilder::engine::config::{BuildConfig, BuildConfigBuilder, ForcefieldSource};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialForcefieldConfig {
    #[serde(rename = "non-bonded-path")]
    non_bonded_path: Option<PathBuf>,
    #[serde(rename = "charges-path")]
    charges_path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialScoringConfig {
    cutoff: Option<f64>,
    #[serde(rename = "adjacent-residue-exclusion")]
    adjacent_residue_exclusion: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialCacheConfig {
    #[serde(rename = "promotion-threshold")]
    promotion_threshold: Option<u64>,
    #[serde(rename = "store-path")]
    store_path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialBuildConfig {
    forcefield: Option<PartialForcefieldConfig>,
    scoring: Option<PartialScoringConfig>,
    cache: Option<PartialCacheConfig>,
}

/// Fully merged settings for one `build` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSettings {
    pub build: BuildConfig,
    /// `None` means the default store location.
    pub store_path: Option<PathBuf>,
}

impl PartialBuildConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Precedence, highest first: dedicated CLI flags, `-S` assignments, the
    /// config file, library defaults.
    pub fn merge_with_cli(mut self, args: &BuildArgs) -> Result<BuildSettings> {
        self.apply_set_values(&args.set_values)?;

        let ff_config = self.forcefield.take().unwrap_or_default();
        let scoring_config = self.scoring.take().unwrap_or_default();
        let cache_config = self.cache.take().unwrap_or_default();

        let mut builder = BuildConfigBuilder::new()
            .forcefield(Self::merge_forcefield(ff_config)?);

        if let Some(threshold) = args.threshold.or(cache_config.promotion_threshold) {
            builder = builder.promotion_threshold(threshold);
        }
        if let Some(cutoff) = args.cutoff.or(scoring_config.cutoff) {
            builder = builder.cutoff(cutoff);
        }
        if let Some(exclusion) = scoring_config.adjacent_residue_exclusion {
            builder = builder.adjacent_residue_exclusion(exclusion);
        }

        let build = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(BuildSettings {
            build,
            store_path: args.store.clone().or(cache_config.store_path),
        })
    }

    fn merge_forcefield(partial: PartialForcefieldConfig) -> Result<ForcefieldSource> {
        match (partial.non_bonded_path, partial.charges_path) {
            (None, None) => Ok(ForcefieldSource::Builtin),
            (Some(non_bonded_path), Some(charges_path)) => Ok(ForcefieldSource::Files {
                non_bonded_path,
                charges_path,
            }),
            _ => Err(CliError::Config(
                "`forcefield.non-bonded-path` and `forcefield.charges-path` must be given together."
                    .to_string(),
            )),
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "cache.promotion-threshold" => {
                    self.cache
                        .get_or_insert_with(Default::default)
                        .promotion_threshold = Some(parse_value(key, value_str)?);
                }
                "cache.store-path" => {
                    self.cache.get_or_insert_with(Default::default).store_path =
                        Some(PathBuf::from(value_str));
                }
                "scoring.cutoff" => {
                    self.scoring.get_or_insert_with(Default::default).cutoff =
                        Some(parse_value(key, value_str)?);
                }
                "scoring.adjacent-residue-exclusion" => {
                    self.scoring
                        .get_or_insert_with(Default::default)
                        .adjacent_residue_exclusion = Some(parse_value(key, value_str)?);
                }
                "forcefield.non-bonded-path" => {
                    self.forcefield
                        .get_or_insert_with(Default::default)
                        .non_bonded_path = Some(PathBuf::from(value_str));
                }
                "forcefield.charges-path" => {
                    self.forcefield
                        .get_or_insert_with(Default::default)
                        .charges_path = Some(PathBuf::from(value_str));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value_str
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn build_args(extra: &[&str]) -> BuildArgs {
        let mut argv = vec!["ccbuilder", "build", "-i", "params.json"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Build(args) => args,
            other => panic!("expected build command, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_produces_library_defaults() {
        let settings = PartialBuildConfig::default()
            .merge_with_cli(&build_args(&[]))
            .unwrap();
        assert_eq!(settings.build, BuildConfig::default());
        assert_eq!(settings.store_path, None);
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ccbuilder.toml");
        fs::write(
            &path,
            r#"
[scoring]
cutoff = 12.5
adjacent-residue-exclusion = 2

[cache]
promotion-threshold = 3
store-path = "/tmp/builds.json"
"#,
        )
        .unwrap();

        let settings = PartialBuildConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&build_args(&[]))
            .unwrap();
        assert_eq!(settings.build.scoring.cutoff, 12.5);
        assert_eq!(settings.build.scoring.adjacent_residue_exclusion, 2);
        assert_eq!(settings.build.promotion_threshold, 3);
        assert_eq!(settings.store_path, Some(PathBuf::from("/tmp/builds.json")));
    }

    #[test]
    fn unknown_keys_in_file_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ccbuilder.toml");
        fs::write(&path, "[scoring]\nradius = 3.0\n").unwrap();

        let result = PartialBuildConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn cli_flags_override_set_values_and_file() {
        let partial: PartialBuildConfig =
            toml::from_str("[cache]\npromotion-threshold = 3\n").unwrap();
        let args = build_args(&[
            "--threshold",
            "9",
            "-S",
            "cache.promotion-threshold=4",
            "-S",
            "scoring.cutoff=7.5",
        ]);

        let settings = partial.merge_with_cli(&args).unwrap();
        assert_eq!(settings.build.promotion_threshold, 9);
        assert_eq!(settings.build.scoring.cutoff, 7.5);
    }

    #[test]
    fn set_values_override_file() {
        let partial: PartialBuildConfig =
            toml::from_str("[scoring]\nadjacent-residue-exclusion = 4\n").unwrap();
        let args = build_args(&["-S", "scoring.adjacent-residue-exclusion=0"]);
        let settings = partial.merge_with_cli(&args).unwrap();
        assert_eq!(settings.build.scoring.adjacent_residue_exclusion, 0);
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in ["scoring.cutoff", "scoring.cutoff=abc", "scoring.radius=1.0"] {
            let result = PartialBuildConfig::default().merge_with_cli(&build_args(&["-S", bad]));
            assert!(matches!(result, Err(CliError::Config(_))), "{bad}");
        }
    }

    #[test]
    fn forcefield_paths_must_come_in_pairs() {
        let args = build_args(&["-S", "forcefield.non-bonded-path=ff.toml"]);
        let result = PartialBuildConfig::default().merge_with_cli(&args);
        assert!(matches!(result, Err(CliError::Config(_))));

        let args = build_args(&[
            "-S",
            "forcefield.non-bonded-path=ff.toml",
            "-S",
            "forcefield.charges-path=charges.csv",
        ]);
        let settings = PartialBuildConfig::default().merge_with_cli(&args).unwrap();
        assert_eq!(
            settings.build.forcefield,
            ForcefieldSource::Files {
                non_bonded_path: PathBuf::from("ff.toml"),
                charges_path: PathBuf::from("charges.csv"),
            }
        );
    }

    #[test]
    fn zero_threshold_is_a_config_error() {
        let result = PartialBuildConfig::default().merge_with_cli(&build_args(&["--threshold", "0"]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
