use super::node::Node;
use super::strategy::{
    MissingValueStrategy, NoTrueChildStrategy, ScoringStrategies, SplitCharacteristic,
};
use crate::error::{ModelError, NotSupportedError, ScoreError};
use crate::predicate::PredicateResult;
use crate::record::Record;
use tracing::{debug, trace};

/// Outcome of one scoring call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult<'a> {
    /// Predicted label, `None` when a strategy chose not to predict.
    pub value: Option<String>,
    /// Confidence of `value` at the terminating node, 0 when unavailable.
    pub confidence: f64,
    /// Every node visited, root first.
    pub nodes: Vec<&'a Node>,
}

impl<'a> ScoreResult<'a> {
    /// Node where traversal stopped.
    pub fn terminal(&self) -> Option<&'a Node> {
        self.nodes.last().copied()
    }

    pub fn path_labels(&self) -> Vec<&'a str> {
        self.nodes.iter().map(|node| node.label()).collect()
    }
}

/// How one round of child evaluation came out.
enum Step<'a> {
    Descend(&'a Node),
    Stop(Stop),
}

enum Stop {
    Leaf,
    Missing,
    NoTrueChild,
}

/// Walk the tree from `root` and predict for `record`.
///
/// At each node every child predicate is evaluated in document order. A
/// single true child is entered; several true children are an error under
/// a binary split and resolve to the first one otherwise. With no true
/// child, unknown results defer to the missing value strategy and all-false
/// results to the no true child strategy.
pub fn score_tree<'a>(
    root: &'a Node,
    split: SplitCharacteristic,
    strategies: ScoringStrategies,
    record: &Record,
) -> Result<ScoreResult<'a>, ScoreError> {
    let mut current = root;
    let mut path = vec![root];

    loop {
        match step(current, split, record)? {
            Step::Descend(child) => {
                debug!(from = current.label(), to = child.label(), "descending");
                current = child;
                path.push(child);
            }
            Step::Stop(Stop::Leaf) => {
                debug!(node = current.label(), "reached leaf");
                return Ok(last_prediction(current, path));
            }
            Step::Stop(Stop::Missing) => {
                debug!(
                    node = current.label(),
                    strategy = %strategies.missing_value,
                    "unresolved children, applying missing value strategy"
                );
                return match strategies.missing_value {
                    MissingValueStrategy::NullPrediction => Ok(null_prediction(path)),
                    MissingValueStrategy::LastPrediction => Ok(last_prediction(current, path)),
                    unsupported => Err(NotSupportedError::MissingValueStrategy(unsupported).into()),
                };
            }
            Step::Stop(Stop::NoTrueChild) => {
                debug!(
                    node = current.label(),
                    strategy = %strategies.no_true_child,
                    "no true child"
                );
                return Ok(match strategies.no_true_child {
                    NoTrueChildStrategy::ReturnNullPrediction => null_prediction(path),
                    NoTrueChildStrategy::ReturnLastPrediction => last_prediction(current, path),
                });
            }
        }
    }
}

fn step<'a>(
    current: &'a Node,
    split: SplitCharacteristic,
    record: &Record,
) -> Result<Step<'a>, ScoreError> {
    if current.is_leaf() {
        return Ok(Step::Stop(Stop::Leaf));
    }

    let mut first_true = None;
    let mut true_count = 0usize;
    let mut saw_unknown = false;

    for child in &current.children {
        let result = child.predicate.evaluate(record)?;
        trace!(node = child.label(), ?result, "evaluated child");
        match result {
            PredicateResult::True => {
                true_count += 1;
                first_true.get_or_insert(child);
            }
            PredicateResult::Unknown => saw_unknown = true,
            PredicateResult::False => {}
        }
    }

    if true_count > 1 && split == SplitCharacteristic::BinarySplit {
        return Err(ModelError::MultipleTrueChildren {
            node: current.label().to_string(),
            count: true_count,
        }
        .into());
    }

    Ok(match first_true {
        Some(child) => Step::Descend(child),
        None if saw_unknown => Step::Stop(Stop::Missing),
        None => Step::Stop(Stop::NoTrueChild),
    })
}

fn last_prediction<'a>(node: &'a Node, path: Vec<&'a Node>) -> ScoreResult<'a> {
    let confidence = node
        .score
        .as_deref()
        .map(|score| node.confidence_for(score))
        .unwrap_or(0.0);
    ScoreResult {
        value: node.score.clone(),
        confidence,
        nodes: path,
    }
}

fn null_prediction(path: Vec<&Node>) -> ScoreResult<'_> {
    ScoreResult {
        value: None,
        confidence: 0.0,
        nodes: path,
    }
}
