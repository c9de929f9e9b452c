use super::engine::{score_tree, ScoreResult};
use super::node::Node;
use super::strategy::{
    MissingValueStrategy, NoTrueChildStrategy, ScoringStrategies, SplitCharacteristic,
};
use crate::error::ScoreError;
use crate::record::Record;
use std::sync::Arc;

/// A field declared in the model's mining schema.
///
/// Kept as metadata for listings; scoring never consults it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningField {
    pub name: String,
    pub usage_type: Option<String>,
}

/// A loaded decision tree plus the policies used to score it.
///
/// The node tree sits behind an `Arc` and is never mutated, so clones are
/// cheap and share it. Changing a strategy needs `&mut self`, which rules
/// out reconfiguring a model while it is being scored; use
/// [`TreeModel::with_strategies`] or [`TreeModel::score_with`] to apply a
/// different policy to a shared model.
#[derive(Debug, Clone)]
pub struct TreeModel {
    pub name: Option<String>,
    pub function_name: Option<String>,
    pub mining_fields: Vec<MiningField>,
    root: Arc<Node>,
    split_characteristic: SplitCharacteristic,
    strategies: ScoringStrategies,
}

impl TreeModel {
    pub fn new(root: Node) -> Self {
        Self {
            name: None,
            function_name: None,
            mining_fields: Vec::new(),
            root: Arc::new(root),
            split_characteristic: SplitCharacteristic::default(),
            strategies: ScoringStrategies::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_split_characteristic(mut self, split: SplitCharacteristic) -> Self {
        self.split_characteristic = split;
        self
    }

    /// Copy of this model sharing the same node tree, scored under `strategies`.
    pub fn with_strategies(&self, strategies: ScoringStrategies) -> Self {
        Self {
            strategies,
            ..self.clone()
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn split_characteristic(&self) -> SplitCharacteristic {
        self.split_characteristic
    }

    pub fn strategies(&self) -> ScoringStrategies {
        self.strategies
    }

    pub fn missing_value_strategy(&self) -> MissingValueStrategy {
        self.strategies.missing_value
    }

    pub fn no_true_child_strategy(&self) -> NoTrueChildStrategy {
        self.strategies.no_true_child
    }

    pub fn set_missing_value_strategy(&mut self, strategy: MissingValueStrategy) {
        self.strategies.missing_value = strategy;
    }

    pub fn set_no_true_child_strategy(&mut self, strategy: NoTrueChildStrategy) {
        self.strategies.no_true_child = strategy;
    }

    pub fn set_strategies(&mut self, strategies: ScoringStrategies) {
        self.strategies = strategies;
    }

    /// Score `record` under this model's configured strategies.
    pub fn score<'a>(&'a self, record: &Record) -> Result<ScoreResult<'a>, ScoreError> {
        self.score_with(record, self.strategies)
    }

    /// Score `record` under `strategies`, ignoring the configured ones.
    pub fn score_with<'a>(
        &'a self,
        record: &Record,
        strategies: ScoringStrategies,
    ) -> Result<ScoreResult<'a>, ScoreError> {
        score_tree(&self.root, self.split_characteristic, strategies, record)
    }

    /// Name for display; unnamed models are shown as `<unnamed>`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Whether two models share the same node tree allocation.
    pub fn shares_tree_with(&self, other: &TreeModel) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}
