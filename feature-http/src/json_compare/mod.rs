//! Structural comparison of JSON documents.
//!
//! [`MatchMode::Strict`] requires both documents to be equal apart from
//! object key order. [`MatchMode::Subtree`] only requires the expected
//! document to be contained in the actual one: objects may carry extra keys
//! and arrays extra trailing elements, at any depth.

pub mod error;

use error::{Difference, DifferenceKind, JsonCompareError};
use serde_json::{Map, Number, Value};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MatchMode {
    Strict,
    Subtree,
}

#[derive(Debug, Copy, Clone)]
pub struct Comparator {
    mode: MatchMode,
}

impl Comparator {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    /// Parses both documents and compares them, collecting every difference.
    pub fn compare(&self, actual: &[u8], expected: &[u8]) -> Result<(), JsonCompareError> {
        let actual: Value =
            serde_json::from_slice(actual).map_err(JsonCompareError::InvalidActual)?;
        let expected: Value =
            serde_json::from_slice(expected).map_err(JsonCompareError::InvalidExpected)?;

        self.compare_values(&actual, &expected)
    }

    pub fn compare_values(&self, actual: &Value, expected: &Value) -> Result<(), JsonCompareError> {
        let mut differences = Vec::new();
        self.walk(&mut String::from("$"), actual, expected, &mut differences);

        if differences.is_empty() {
            Ok(())
        } else {
            Err(JsonCompareError::Mismatch(differences))
        }
    }

    fn walk(
        &self,
        path: &mut String,
        actual: &Value,
        expected: &Value,
        differences: &mut Vec<Difference>,
    ) {
        match (expected, actual) {
            (Value::Object(expected), Value::Object(actual)) => {
                self.walk_object(path, actual, expected, differences)
            }
            (Value::Array(expected), Value::Array(actual)) => {
                self.walk_array(path, actual, expected, differences)
            }
            (Value::Number(expected), Value::Number(actual)) => {
                if !numbers_equal(expected, actual) {
                    differences.push(value_mismatch(path, expected.clone(), actual.clone()));
                }
            }
            (expected, actual) if type_name(expected) != type_name(actual) => {
                differences.push(Difference {
                    path: path.clone(),
                    kind: DifferenceKind::TypeMismatch {
                        expected: type_name(expected),
                        actual: type_name(actual),
                    },
                })
            }
            (expected, actual) => {
                if expected != actual {
                    differences.push(value_mismatch(path, expected.clone(), actual.clone()));
                }
            }
        }
    }

    fn walk_object(
        &self,
        path: &mut String,
        actual: &Map<String, Value>,
        expected: &Map<String, Value>,
        differences: &mut Vec<Difference>,
    ) {
        for (key, expected_value) in expected {
            let len = path.len();
            push_key(path, key);

            match actual.get(key) {
                Some(actual_value) => self.walk(path, actual_value, expected_value, differences),
                None => differences.push(Difference {
                    path: path.clone(),
                    kind: DifferenceKind::MissingKey,
                }),
            }

            path.truncate(len);
        }

        if self.mode == MatchMode::Strict {
            for key in actual.keys().filter(|key| !expected.contains_key(*key)) {
                let len = path.len();
                push_key(path, key);
                differences.push(Difference {
                    path: path.clone(),
                    kind: DifferenceKind::UnexpectedKey,
                });
                path.truncate(len);
            }
        }
    }

    fn walk_array(
        &self,
        path: &mut String,
        actual: &[Value],
        expected: &[Value],
        differences: &mut Vec<Difference>,
    ) {
        let length_differs = match self.mode {
            MatchMode::Strict => actual.len() != expected.len(),
            MatchMode::Subtree => actual.len() < expected.len(),
        };

        if length_differs {
            differences.push(Difference {
                path: path.clone(),
                kind: DifferenceKind::LengthMismatch {
                    expected: expected.len(),
                    actual: actual.len(),
                },
            });
        }

        for (index, (expected_value, actual_value)) in expected.iter().zip(actual).enumerate() {
            let len = path.len();
            path.push_str(&format!("[{}]", index));
            self.walk(path, actual_value, expected_value, differences);
            path.truncate(len);
        }
    }
}

fn push_key(path: &mut String, key: &str) {
    if !key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == '_') {
        path.push('.');
        path.push_str(key);
    } else {
        path.push_str(&format!("[{:?}]", key));
    }
}

fn value_mismatch<T: Into<Value>>(path: &str, expected: T, actual: T) -> Difference {
    Difference {
        path: path.into(),
        kind: DifferenceKind::ValueMismatch {
            expected: expected.into(),
            actual: actual.into(),
        },
    }
}

// `1` and `1.0` are the same number in a JSON document.
fn numbers_equal(expected: &Number, actual: &Number) -> bool {
    if let (Some(expected), Some(actual)) = (expected.as_i64(), actual.as_i64()) {
        return expected == actual;
    }
    if let (Some(expected), Some(actual)) = (expected.as_u64(), actual.as_u64()) {
        return expected == actual;
    }

    match (expected.as_f64(), actual.as_f64()) {
        (Some(expected), Some(actual)) => expected == actual,
        _ => false,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
