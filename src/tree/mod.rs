pub mod engine;
pub mod model;
pub mod node;
pub mod strategy;
pub mod validation;

pub use engine::{score_tree, ScoreResult};
pub use model::{MiningField, TreeModel};
pub use node::{Node, ScoreDistribution};
pub use strategy::{
    MissingValueStrategy, NoTrueChildStrategy, ParseStrategyError, ScoringStrategies,
    SplitCharacteristic,
};
pub use validation::{only_warnings, validate_model};
