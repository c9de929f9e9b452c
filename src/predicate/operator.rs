use crate::error::EvaluationError;
use std::fmt;
use std::str::FromStr;

/// Operators of a `SimplePredicate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleOperator {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    IsMissing,
    IsNotMissing,
}

impl SimpleOperator {
    /// isMissing and isNotMissing are the only operators without a literal.
    pub fn requires_value(self) -> bool {
        !matches!(self, SimpleOperator::IsMissing | SimpleOperator::IsNotMissing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SimpleOperator::Equal => "equal",
            SimpleOperator::NotEqual => "notEqual",
            SimpleOperator::LessThan => "lessThan",
            SimpleOperator::LessOrEqual => "lessOrEqual",
            SimpleOperator::GreaterThan => "greaterThan",
            SimpleOperator::GreaterOrEqual => "greaterOrEqual",
            SimpleOperator::IsMissing => "isMissing",
            SimpleOperator::IsNotMissing => "isNotMissing",
        }
    }
}

impl FromStr for SimpleOperator {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(SimpleOperator::Equal),
            "notequal" => Ok(SimpleOperator::NotEqual),
            "lessthan" => Ok(SimpleOperator::LessThan),
            "lessorequal" => Ok(SimpleOperator::LessOrEqual),
            "greaterthan" => Ok(SimpleOperator::GreaterThan),
            "greaterorequal" => Ok(SimpleOperator::GreaterOrEqual),
            "ismissing" => Ok(SimpleOperator::IsMissing),
            "isnotmissing" => Ok(SimpleOperator::IsNotMissing),
            _ => Err(EvaluationError::UnknownOperator {
                kind: "SimplePredicate",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SimpleOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators of a `SimpleSetPredicate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    IsIn,
    IsNotIn,
}

impl FromStr for SetOperator {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isin" => Ok(SetOperator::IsIn),
            "isnotin" => Ok(SetOperator::IsNotIn),
            _ => Err(EvaluationError::UnknownOperator {
                kind: "SimpleSetPredicate",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SetOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOperator::IsIn => f.write_str("isIn"),
            SetOperator::IsNotIn => f.write_str("isNotIn"),
        }
    }
}

/// Operators of a `CompoundPredicate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperator {
    And,
    Or,
    Xor,
    Surrogate,
}

impl FromStr for BooleanOperator {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(BooleanOperator::And),
            "or" => Ok(BooleanOperator::Or),
            "xor" => Ok(BooleanOperator::Xor),
            "surrogate" => Ok(BooleanOperator::Surrogate),
            _ => Err(EvaluationError::UnknownOperator {
                kind: "CompoundPredicate",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanOperator::And => f.write_str("and"),
            BooleanOperator::Or => f.write_str("or"),
            BooleanOperator::Xor => f.write_str("xor"),
            BooleanOperator::Surrogate => f.write_str("surrogate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_operator_case_insensitive_and_trimmed() {
        assert_eq!("lessThan".parse::<SimpleOperator>().unwrap(), SimpleOperator::LessThan);
        assert_eq!("  LESSTHAN ".parse::<SimpleOperator>().unwrap(), SimpleOperator::LessThan);
        assert_eq!("isnotmissing".parse::<SimpleOperator>().unwrap(), SimpleOperator::IsNotMissing);
    }

    #[test]
    fn test_simple_operator_display_roundtrips() {
        for op in [
            SimpleOperator::Equal,
            SimpleOperator::NotEqual,
            SimpleOperator::LessThan,
            SimpleOperator::LessOrEqual,
            SimpleOperator::GreaterThan,
            SimpleOperator::GreaterOrEqual,
            SimpleOperator::IsMissing,
            SimpleOperator::IsNotMissing,
        ] {
            assert_eq!(op.to_string().parse::<SimpleOperator>().unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_operator() {
        let err = "approximately".parse::<SimpleOperator>().unwrap_err();
        assert!(matches!(err, EvaluationError::UnknownOperator { .. }));
        assert!("within".parse::<SetOperator>().is_err());
        assert!("nand".parse::<BooleanOperator>().is_err());
    }

    #[test]
    fn test_requires_value() {
        assert!(SimpleOperator::Equal.requires_value());
        assert!(!SimpleOperator::IsMissing.requires_value());
        assert!(!SimpleOperator::IsNotMissing.requires_value());
    }

    #[test]
    fn test_boolean_operator_parse() {
        assert_eq!(" Surrogate".parse::<BooleanOperator>().unwrap(), BooleanOperator::Surrogate);
        assert_eq!("XOR".parse::<BooleanOperator>().unwrap(), BooleanOperator::Xor);
    }
}
