use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unrecognized strategy spelling.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseStrategyError {
    pub kind: &'static str,
    pub value: String,
}

/// What to do when no child resolved to true and at least one was unknown.
///
/// Only `NullPrediction` and `LastPrediction` are implemented; the scorer
/// refuses the others instead of approximating them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingValueStrategy {
    NullPrediction,
    LastPrediction,
    DefaultChild,
    WeightedConfidence,
    AggregateNodes,
    #[default]
    None,
}

impl MissingValueStrategy {
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            MissingValueStrategy::NullPrediction | MissingValueStrategy::LastPrediction
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MissingValueStrategy::NullPrediction => "nullPrediction",
            MissingValueStrategy::LastPrediction => "lastPrediction",
            MissingValueStrategy::DefaultChild => "defaultChild",
            MissingValueStrategy::WeightedConfidence => "weightedConfidence",
            MissingValueStrategy::AggregateNodes => "aggregateNodes",
            MissingValueStrategy::None => "none",
        }
    }
}

impl FromStr for MissingValueStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nullprediction" => Ok(MissingValueStrategy::NullPrediction),
            "lastprediction" => Ok(MissingValueStrategy::LastPrediction),
            "defaultchild" => Ok(MissingValueStrategy::DefaultChild),
            "weightedconfidence" => Ok(MissingValueStrategy::WeightedConfidence),
            "aggregatenodes" => Ok(MissingValueStrategy::AggregateNodes),
            "none" => Ok(MissingValueStrategy::None),
            _ => Err(ParseStrategyError {
                kind: "missing value strategy",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for MissingValueStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when every child is definitively false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoTrueChildStrategy {
    #[default]
    ReturnNullPrediction,
    ReturnLastPrediction,
}

impl NoTrueChildStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            NoTrueChildStrategy::ReturnNullPrediction => "returnNullPrediction",
            NoTrueChildStrategy::ReturnLastPrediction => "returnLastPrediction",
        }
    }
}

impl FromStr for NoTrueChildStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "returnnullprediction" => Ok(NoTrueChildStrategy::ReturnNullPrediction),
            "returnlastprediction" => Ok(NoTrueChildStrategy::ReturnLastPrediction),
            _ => Err(ParseStrategyError {
                kind: "no true child strategy",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NoTrueChildStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether nodes split two ways or many ways.
///
/// Under `BinarySplit` at most one child may evaluate true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitCharacteristic {
    BinarySplit,
    #[default]
    MultiSplit,
}

impl SplitCharacteristic {
    pub fn as_str(self) -> &'static str {
        match self {
            SplitCharacteristic::BinarySplit => "binarySplit",
            SplitCharacteristic::MultiSplit => "multiSplit",
        }
    }
}

impl FromStr for SplitCharacteristic {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binarysplit" => Ok(SplitCharacteristic::BinarySplit),
            "multisplit" => Ok(SplitCharacteristic::MultiSplit),
            _ => Err(ParseStrategyError {
                kind: "split characteristic",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SplitCharacteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The runtime-tunable policies consulted while scoring.
///
/// Kept apart from the node tree so the same tree can be scored under
/// different policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringStrategies {
    #[serde(default)]
    pub missing_value: MissingValueStrategy,
    #[serde(default)]
    pub no_true_child: NoTrueChildStrategy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_pmml() {
        assert_eq!(MissingValueStrategy::default(), MissingValueStrategy::None);
        assert_eq!(
            NoTrueChildStrategy::default(),
            NoTrueChildStrategy::ReturnNullPrediction
        );
        assert_eq!(SplitCharacteristic::default(), SplitCharacteristic::MultiSplit);
    }

    #[test]
    fn test_parse_pmml_spelling() {
        assert_eq!(
            "lastPrediction".parse::<MissingValueStrategy>().unwrap(),
            MissingValueStrategy::LastPrediction
        );
        assert_eq!(
            " AGGREGATENODES ".parse::<MissingValueStrategy>().unwrap(),
            MissingValueStrategy::AggregateNodes
        );
        assert_eq!(
            "returnLastPrediction".parse::<NoTrueChildStrategy>().unwrap(),
            NoTrueChildStrategy::ReturnLastPrediction
        );
        assert_eq!(
            "binarySplit".parse::<SplitCharacteristic>().unwrap(),
            SplitCharacteristic::BinarySplit
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "guess".parse::<MissingValueStrategy>().unwrap_err();
        assert_eq!(err.to_string(), "unknown missing value strategy 'guess'");
        assert!("returnSomething".parse::<NoTrueChildStrategy>().is_err());
        assert!("ternary".parse::<SplitCharacteristic>().is_err());
    }

    #[test]
    fn test_supported_subset() {
        assert!(MissingValueStrategy::NullPrediction.is_supported());
        assert!(MissingValueStrategy::LastPrediction.is_supported());
        assert!(!MissingValueStrategy::DefaultChild.is_supported());
        assert!(!MissingValueStrategy::WeightedConfidence.is_supported());
        assert!(!MissingValueStrategy::AggregateNodes.is_supported());
        assert!(!MissingValueStrategy::None.is_supported());
    }

    #[test]
    fn test_strategies_yaml_uses_pmml_names() {
        let yaml = r#"
missing_value: lastPrediction
no_true_child: returnLastPrediction
"#;
        let strategies: ScoringStrategies = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(strategies.missing_value, MissingValueStrategy::LastPrediction);
        assert_eq!(
            strategies.no_true_child,
            NoTrueChildStrategy::ReturnLastPrediction
        );
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(MissingValueStrategy::WeightedConfidence.to_string(), "weightedConfidence");
        assert_eq!(NoTrueChildStrategy::ReturnNullPrediction.to_string(), "returnNullPrediction");
        assert_eq!(SplitCharacteristic::MultiSplit.to_string(), "multiSplit");
    }
}
