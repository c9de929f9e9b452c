//! The predicate sub-language attached to every tree node.
//!
//! A predicate is a pure test over a [`Record`](crate::record::Record) that
//! resolves to a three-valued [`PredicateResult`]. Missing fields make a test
//! `Unknown` rather than `False`, so the scoring engine can tell "this branch
//! does not apply" apart from "this branch could not be decided".

mod eval;
pub mod operator;
pub mod result;

pub use eval::evaluate;
pub use operator::{BooleanOperator, SetOperator, SimpleOperator};
pub use result::PredicateResult;

use crate::error::EvaluationError;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    True,
    False,
    Simple {
        field: String,
        operator: SimpleOperator,
        value: Option<String>,
    },
    SimpleSet {
        field: String,
        operator: SetOperator,
        values: Vec<String>,
    },
    Compound {
        operator: BooleanOperator,
        operands: Vec<Predicate>,
    },
}

impl Predicate {
    pub fn evaluate(&self, record: &Record) -> Result<PredicateResult, EvaluationError> {
        evaluate(self, record)
    }

    /// Simple comparison against a literal.
    pub fn simple(field: impl Into<String>, operator: SimpleOperator, value: impl Into<String>) -> Self {
        Predicate::Simple {
            field: field.into(),
            operator,
            value: Some(value.into()),
        }
    }

    pub fn is_missing(field: impl Into<String>) -> Self {
        Predicate::Simple {
            field: field.into(),
            operator: SimpleOperator::IsMissing,
            value: None,
        }
    }

    pub fn is_not_missing(field: impl Into<String>) -> Self {
        Predicate::Simple {
            field: field.into(),
            operator: SimpleOperator::IsNotMissing,
            value: None,
        }
    }

    pub fn set<I, S>(field: impl Into<String>, operator: SetOperator, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::SimpleSet {
            field: field.into(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn compound(operator: BooleanOperator, operands: Vec<Predicate>) -> Self {
        Predicate::Compound { operator, operands }
    }

    pub fn and(operands: Vec<Predicate>) -> Self {
        Self::compound(BooleanOperator::And, operands)
    }

    pub fn or(operands: Vec<Predicate>) -> Self {
        Self::compound(BooleanOperator::Or, operands)
    }

    pub fn xor(operands: Vec<Predicate>) -> Self {
        Self::compound(BooleanOperator::Xor, operands)
    }

    pub fn surrogate(operands: Vec<Predicate>) -> Self {
        Self::compound(BooleanOperator::Surrogate, operands)
    }

    /// Field names this predicate reads, in first-seen order.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::True | Predicate::False => {}
            Predicate::Simple { field, .. } | Predicate::SimpleSet { field, .. } => {
                if !out.contains(&field.as_str()) {
                    out.push(field);
                }
            }
            Predicate::Compound { operands, .. } => {
                for operand in operands {
                    operand.collect_fields(out);
                }
            }
        }
    }
}
