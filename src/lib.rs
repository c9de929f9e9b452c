//! Score records against PMML decision-tree models.
//!
//! ```no_run
//! use pmml_tree::{Pmml, Record};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pmml = Pmml::load(std::path::Path::new("golf.xml"))?;
//! let model = pmml.get_by_name("golfing").ok_or("no such model")?;
//! let result = model.score(&Record::new().with("outlook", "sunny"))?;
//! println!("{:?} ({})", result.value, result.confidence);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod pmml;
pub mod predicate;
pub mod record;
pub mod telemetry;
pub mod tree;

pub use error::{EvaluationError, ModelError, NotSupportedError, PmmlError, ScoreError};
pub use pmml::Pmml;
pub use predicate::{Predicate, PredicateResult};
pub use record::{Record, Value};
pub use tree::{
    MissingValueStrategy, NoTrueChildStrategy, ScoreResult, ScoringStrategies,
    SplitCharacteristic, TreeModel,
};
