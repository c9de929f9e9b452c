use crate::tree::{MissingValueStrategy, NoTrueChildStrategy, ScoringStrategies};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub output: OutputFormat,
    /// Glob patterns of PMML documents loaded when none is named on the command line.
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategies: Option<StrategyOverrides>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output: OutputFormat::default(),
            models: Vec::new(),
            strategies: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Strategies that replace what a document declares. Unset fields leave
/// the document's value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_value: Option<MissingValueStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_true_child: Option<NoTrueChildStrategy>,
}

impl StrategyOverrides {
    pub fn apply(&self, base: ScoringStrategies) -> ScoringStrategies {
        ScoringStrategies {
            missing_value: self.missing_value.unwrap_or(base.missing_value),
            no_true_child: self.no_true_child.unwrap_or(base.no_true_child),
        }
    }

    /// Layer `other` on top, so its set fields win.
    pub fn or_from(self, other: StrategyOverrides) -> StrategyOverrides {
        StrategyOverrides {
            missing_value: other.missing_value.or(self.missing_value),
            no_true_child: other.no_true_child.or(self.no_true_child),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
log_level: debug
output: json
models:
  - "~/models/*.pmml"
  - /srv/trees/golf.xml
strategies:
  missing_value: lastPrediction
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.models.len(), 2);
        let strategies = config.strategies.unwrap();
        assert_eq!(strategies.missing_value, Some(MissingValueStrategy::LastPrediction));
        assert_eq!(strategies.no_true_child, None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("queries: []");
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_apply_only_set_fields() {
        let base = ScoringStrategies {
            missing_value: MissingValueStrategy::NullPrediction,
            no_true_child: NoTrueChildStrategy::ReturnLastPrediction,
        };
        let overrides = StrategyOverrides {
            missing_value: Some(MissingValueStrategy::LastPrediction),
            no_true_child: None,
        };
        let applied = overrides.apply(base);
        assert_eq!(applied.missing_value, MissingValueStrategy::LastPrediction);
        assert_eq!(applied.no_true_child, NoTrueChildStrategy::ReturnLastPrediction);
    }

    #[test]
    fn test_or_from_prefers_later_layer() {
        let config = StrategyOverrides {
            missing_value: Some(MissingValueStrategy::NullPrediction),
            no_true_child: Some(NoTrueChildStrategy::ReturnLastPrediction),
        };
        let cli = StrategyOverrides {
            missing_value: Some(MissingValueStrategy::LastPrediction),
            no_true_child: None,
        };
        let merged = config.or_from(cli);
        assert_eq!(merged.missing_value, Some(MissingValueStrategy::LastPrediction));
        assert_eq!(merged.no_true_child, Some(NoTrueChildStrategy::ReturnLastPrediction));
    }
}
