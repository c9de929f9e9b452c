use super::{BooleanOperator, Predicate, PredicateResult, SetOperator, SimpleOperator};
use crate::error::EvaluationError;
use crate::record::{parse_finite, Record, Value};

/// Evaluate `predicate` against `record`.
///
/// Any operator other than isMissing/isNotMissing yields `Unknown` when its
/// field is absent. Ordering operators fail if either side is not numeric.
pub fn evaluate(predicate: &Predicate, record: &Record) -> Result<PredicateResult, EvaluationError> {
    match predicate {
        Predicate::True => Ok(PredicateResult::True),
        Predicate::False => Ok(PredicateResult::False),
        Predicate::Simple {
            field,
            operator,
            value,
        } => evaluate_simple(field, *operator, value.as_deref(), record),
        Predicate::SimpleSet {
            field,
            operator,
            values,
        } => {
            let Some(actual) = record.get(field) else {
                return Ok(PredicateResult::Unknown);
            };
            let member = values.iter().any(|literal| values_equal(actual, literal));
            Ok(match operator {
                SetOperator::IsIn => member.into(),
                SetOperator::IsNotIn => (!member).into(),
            })
        }
        Predicate::Compound { operator, operands } => match operator {
            BooleanOperator::And => Ok(PredicateResult::all(evaluate_each(operands, record)?)),
            BooleanOperator::Or => Ok(PredicateResult::any(evaluate_each(operands, record)?)),
            BooleanOperator::Xor => Ok(PredicateResult::exactly_one(evaluate_each(operands, record)?)),
            BooleanOperator::Surrogate => evaluate_surrogate(operands, record),
        },
    }
}

/// Every operand, so an error anywhere surfaces.
fn evaluate_each(
    operands: &[Predicate],
    record: &Record,
) -> Result<Vec<PredicateResult>, EvaluationError> {
    operands.iter().map(|operand| evaluate(operand, record)).collect()
}

/// Operands in order, stopping at the first resolved one. Later operands are
/// never evaluated, so their errors cannot surface.
fn evaluate_surrogate(
    operands: &[Predicate],
    record: &Record,
) -> Result<PredicateResult, EvaluationError> {
    let mut failure = None;
    let result = PredicateResult::first_known(operands.iter().map_while(|operand| {
        match evaluate(operand, record) {
            Ok(result) => Some(result),
            Err(e) => {
                failure = Some(e);
                None
            }
        }
    }));
    match failure {
        Some(e) => Err(e),
        None => Ok(result),
    }
}

fn evaluate_simple(
    field: &str,
    operator: SimpleOperator,
    literal: Option<&str>,
    record: &Record,
) -> Result<PredicateResult, EvaluationError> {
    let actual = record.get(field);
    let compare = |test: fn(f64, f64) -> bool| -> Result<PredicateResult, EvaluationError> {
        // Surrogate mode: an absent field never counts as a failed test.
        let Some(actual) = actual else {
            return Ok(PredicateResult::Unknown);
        };
        let literal = required_literal(field, operator, literal)?;
        let (a, b) = numeric_operands(field, actual, literal)?;
        Ok(test(a, b).into())
    };

    match operator {
        SimpleOperator::IsMissing => Ok(actual.is_none().into()),
        SimpleOperator::IsNotMissing => Ok(actual.is_some().into()),
        SimpleOperator::Equal | SimpleOperator::NotEqual => {
            let Some(actual) = actual else {
                return Ok(PredicateResult::Unknown);
            };
            let equal = values_equal(actual, required_literal(field, operator, literal)?);
            Ok((equal == (operator == SimpleOperator::Equal)).into())
        }
        SimpleOperator::LessThan => compare(|a, b| a < b),
        SimpleOperator::LessOrEqual => compare(|a, b| a <= b),
        SimpleOperator::GreaterThan => compare(|a, b| a > b),
        SimpleOperator::GreaterOrEqual => compare(|a, b| a >= b),
    }
}

fn required_literal<'a>(
    field: &str,
    operator: SimpleOperator,
    literal: Option<&'a str>,
) -> Result<&'a str, EvaluationError> {
    literal.ok_or_else(|| EvaluationError::MissingValue {
        field: field.to_string(),
        operator: operator.to_string(),
    })
}

/// Finite numbers compare numerically when both sides parse; otherwise
/// trimmed text must match exactly, so `NaN` and `inf` are plain labels.
fn values_equal(actual: &Value, literal: &str) -> bool {
    let literal = literal.trim();
    if let (Some(a), Some(b)) = (actual.as_f64(), parse_finite(literal)) {
        return a == b;
    }
    match actual {
        Value::Number(n) => n.to_string() == literal,
        Value::Text(s) => s.trim() == literal,
    }
}

fn numeric_operands(field: &str, actual: &Value, literal: &str) -> Result<(f64, f64), EvaluationError> {
    let not_numeric = || EvaluationError::NotNumeric {
        field: field.to_string(),
        actual: actual.to_string(),
        expected: literal.to_string(),
    };
    let a = actual.as_f64().ok_or_else(not_numeric)?;
    let b = parse_finite(literal).ok_or_else(not_numeric)?;
    Ok((a, b))
}
