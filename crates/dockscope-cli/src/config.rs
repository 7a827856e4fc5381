use crate::error::{CliError, Result};
use dockscope::core::analysis::interactions::PoseScope;
use dockscope::engine::config::{AnalysisConfig, AnalysisConfigBuilder};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialAnalysisSection {
    /// 1-based model number.
    #[serde(rename = "reference-model")]
    reference_model: Option<usize>,
    #[serde(rename = "box-padding")]
    box_padding: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialInteractionsSection {
    scope: Option<PoseScope>,
    #[serde(rename = "enabled-types")]
    enabled_types: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialPlaybackSection {
    #[serde(rename = "interval-ms")]
    interval_ms: Option<u64>,
}

/// Analysis settings as read from a TOML file; every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAnalysisConfig {
    analysis: Option<PartialAnalysisSection>,
    interactions: Option<PartialInteractionsSection>,
    playback: Option<PartialPlaybackSection>,
}

/// Values given as subcommand flags. They win over `--set` and the file.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub reference_model: Option<usize>,
    pub box_padding: Option<f64>,
    pub pose_scope: Option<PoseScope>,
    pub enabled_types: Option<Vec<String>>,
    pub interval_ms: Option<u64>,
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

impl PartialAnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads `path` if given, otherwise starts from an empty config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(
        mut self,
        overrides: &CliOverrides,
        set_values: &[String],
    ) -> Result<AnalysisConfig> {
        self.apply_set_values(set_values)?;

        let analysis = self.analysis.take().unwrap_or_default();
        let interactions = self.interactions.take().unwrap_or_default();
        let playback = self.playback.take().unwrap_or_default();

        let mut builder = AnalysisConfigBuilder::new();

        match overrides.reference_model.or(analysis.reference_model) {
            Some(0) => {
                return Err(CliError::Config(
                    "`analysis.reference-model` is 1-based; 0 is not a model number.".to_string(),
                ));
            }
            Some(model) => builder = builder.reference_pose(Some(model - 1)),
            None => {}
        }
        if let Some(padding) = overrides.box_padding.or(analysis.box_padding) {
            builder = builder.box_padding(padding);
        }
        if let Some(scope) = overrides.pose_scope.or(interactions.scope) {
            builder = builder.pose_scope(scope);
        }
        if let Some(types) = overrides
            .enabled_types
            .clone()
            .or(interactions.enabled_types)
        {
            builder = builder.enabled_types(types);
        }
        if let Some(ms) = overrides.interval_ms.or(playback.interval_ms) {
            builder = builder.autoplay_interval_ms(ms);
        }

        Ok(builder.build()?)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key.trim() {
                "analysis.reference-model" => {
                    self.analysis
                        .get_or_insert_with(Default::default)
                        .reference_model = Some(parse_value(key, value_str, "integer")?);
                }
                "analysis.box-padding" => {
                    self.analysis.get_or_insert_with(Default::default).box_padding =
                        Some(parse_value(key, value_str, "float")?);
                }
                "interactions.scope" => {
                    let scope = match value_str.trim() {
                        "global" => PoseScope::Global,
                        "by-position" => PoseScope::ByPosition,
                        other => {
                            return Err(CliError::Config(format!(
                                "Invalid scope for {}: '{}'. Expected 'global' or 'by-position'.",
                                key, other
                            )));
                        }
                    };
                    self.interactions
                        .get_or_insert_with(Default::default)
                        .scope = Some(scope);
                }
                "playback.interval-ms" => {
                    self.playback.get_or_insert_with(Default::default).interval_ms =
                        Some(parse_value(key, value_str, "integer")?);
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
