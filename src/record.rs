use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A single field value supplied by the caller.
///
/// A field that is not in the [`Record`] at all is *missing*; a present
/// `Text("")` is not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Parse a command-line literal.
    ///
    /// Double-quoted input is always text (quotes stripped), anything that
    /// parses as a finite float is a number, everything else is text.
    /// `nan` and `inf` stay text.
    pub fn parse_literal(s: &str) -> Self {
        let s = s.trim();
        if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
            return Value::Text(s[1..s.len() - 1].to_string());
        }
        match parse_finite(s) {
            Some(n) => Value::Number(n),
            None => Value::Text(s.to_string()),
        }
    }

    /// Numeric view used by comparisons. Non-finite numbers have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Value::Text(s) => parse_finite(s),
        }
    }
}

/// Parse `s` as a finite float. `f64::from_str` also accepts `NaN` and
/// `inf`, which are labels here, not numbers.
pub(crate) fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Failure to build a [`Record`] from user input.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("expected 'field=value', got '{0}'")]
    MalformedAssignment(String),
    #[error("record must be a JSON object")]
    NotAnObject,
    #[error("field '{0}' must be a string, number or boolean")]
    UnsupportedJsonValue(String),
}

/// An input case: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy in tests.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Parse `a=1, b="x"` style input. Blank segments are skipped.
    pub fn parse_assignments(input: &str) -> Result<Self, RecordError> {
        let mut record = Record::new();
        for item in input.split(',') {
            if item.trim().is_empty() {
                continue;
            }
            record.insert_assignment(item)?;
        }
        Ok(record)
    }

    /// Insert one `field=value` pair.
    pub fn insert_assignment(&mut self, item: &str) -> Result<(), RecordError> {
        let (field, value) = item
            .split_once('=')
            .ok_or_else(|| RecordError::MalformedAssignment(item.trim().to_string()))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(RecordError::MalformedAssignment(item.trim().to_string()));
        }
        self.insert(field, Value::parse_literal(value));
        Ok(())
    }

    /// Convert a flat JSON object. `null` members are treated as absent.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, RecordError> {
        let object = json.as_object().ok_or(RecordError::NotAnObject)?;
        let mut record = Record::new();
        for (field, value) in object {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::Number(n) => {
                    let n = n
                        .as_f64()
                        .ok_or_else(|| RecordError::UnsupportedJsonValue(field.clone()))?;
                    record.insert(field.as_str(), n);
                }
                serde_json::Value::String(s) => record.insert(field.as_str(), s.as_str()),
                serde_json::Value::Bool(b) => record.insert(field.as_str(), b.to_string()),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(RecordError::UnsupportedJsonValue(field.clone()))
                }
            }
        }
        Ok(record)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
