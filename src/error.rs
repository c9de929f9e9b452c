use crate::tree::MissingValueStrategy;

/// A predicate could not be evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("unknown {kind} operator '{name}'")]
    UnknownOperator { kind: &'static str, name: String },
    #[error("field '{field}': cannot compare '{actual}' with '{expected}' numerically")]
    NotNumeric {
        field: String,
        actual: String,
        expected: String,
    },
    #[error("field '{field}': operator '{operator}' requires a value")]
    MissingValue { field: String, operator: String },
}

/// The tree is malformed for its declared split characteristic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("node {node}: {count} children evaluated true under a binary split")]
    MultipleTrueChildren { node: String, count: usize },
}

/// A configured strategy has no implementation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotSupportedError {
    #[error("missing value strategy '{0}' is not supported")]
    MissingValueStrategy(MissingValueStrategy),
}

/// Everything that can stop a scoring call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    NotSupported(#[from] NotSupportedError),
}

/// Failure to turn a PMML document into tree models.
#[derive(Debug, thiserror::Error)]
pub enum PmmlError {
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("attribute '{attribute}' is required in '{element}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("attribute '{attribute}' in '{element}' has invalid value '{value}'")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    #[error("'{0}' has no predicate")]
    MissingPredicate(&'static str),
    #[error("'{parent}' requires a '{element}' element")]
    MissingElement {
        parent: &'static str,
        element: &'static str,
    },
    #[error("unexpected element '{found}' in '{parent}'")]
    UnexpectedElement { parent: &'static str, found: String },
    #[error("model '{0}' is defined more than once")]
    DuplicateModel(String),
    #[error(transparent)]
    Predicate(#[from] EvaluationError),
    #[error("document contains no TreeModel")]
    NoTreeModel,
}
