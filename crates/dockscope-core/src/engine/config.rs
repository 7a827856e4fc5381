use crate::core::analysis::interactions::{AlignerConfig, PoseScope, all_plip_types};
use crate::core::utils::geometry::DEFAULT_BOX_PADDING;
use crate::engine::sequencer::DEFAULT_INTERVAL_MS;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub aligner: AlignerConfig,
    /// 0-based pose that RMSD values are measured against.
    pub reference_pose: Option<usize>,
    pub box_padding: f64,
    pub autoplay_interval_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            aligner: AlignerConfig::default(),
            reference_pose: Some(0),
            box_padding: DEFAULT_BOX_PADDING,
            autoplay_interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    pose_scope: Option<PoseScope>,
    enabled_types: Option<HashSet<String>>,
    reference_pose: Option<Option<usize>>,
    box_padding: Option<f64>,
    autoplay_interval_ms: Option<u64>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose_scope(mut self, scope: PoseScope) -> Self {
        self.pose_scope = Some(scope);
        self
    }
    pub fn enabled_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_types = Some(types.into_iter().map(Into::into).collect());
        self
    }
    pub fn reference_pose(mut self, index: Option<usize>) -> Self {
        self.reference_pose = Some(index);
        self
    }
    pub fn box_padding(mut self, padding: f64) -> Self {
        self.box_padding = Some(padding);
        self
    }
    pub fn autoplay_interval_ms(mut self, ms: u64) -> Self {
        self.autoplay_interval_ms = Some(ms);
        self
    }

    /// Builds the config, filling unset values with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] for a negative or non-finite
    /// box padding, a zero autoplay interval, or a blank interaction type.
    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let defaults = AnalysisConfig::default();

        let box_padding = self.box_padding.unwrap_or(defaults.box_padding);
        if !box_padding.is_finite() || box_padding < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "box_padding",
                reason: format!("expected a finite, non-negative distance, got {box_padding}"),
            });
        }

        let autoplay_interval_ms = self
            .autoplay_interval_ms
            .unwrap_or(defaults.autoplay_interval_ms);
        if autoplay_interval_ms == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "autoplay_interval_ms",
                reason: "must be at least 1 ms".to_string(),
            });
        }

        let enabled_types = self.enabled_types.unwrap_or_else(all_plip_types);
        if enabled_types.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::InvalidParameter {
                name: "enabled_types",
                reason: "interaction type names must not be blank".to_string(),
            });
        }

        Ok(AnalysisConfig {
            aligner: AlignerConfig {
                scope: self.pose_scope.unwrap_or(defaults.aligner.scope),
                enabled_types,
            },
            reference_pose: self.reference_pose.unwrap_or(defaults.reference_pose),
            box_padding,
            autoplay_interval_ms,
        })
    }
}
