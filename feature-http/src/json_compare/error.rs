use serde_json::Value;
use std::fmt::{self, Display};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum DifferenceKind {
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    ValueMismatch {
        expected: Value,
        actual: Value,
    },
    MissingKey,
    UnexpectedKey,
    LengthMismatch {
        expected: usize,
        actual: usize,
    },
}

/// A single divergence between the expected and the actual document.
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    /// Location in the document, e.g. `$.user.roles[1]`.
    pub path: String,
    pub kind: DifferenceKind,
}

impl Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DifferenceKind::TypeMismatch { expected, actual } => write!(
                f,
                "{}: expected {}, got {}",
                self.path, expected, actual
            ),
            DifferenceKind::ValueMismatch { expected, actual } => write!(
                f,
                "{}: expected {}, got {}",
                self.path, expected, actual
            ),
            DifferenceKind::MissingKey => write!(f, "{}: missing", self.path),
            DifferenceKind::UnexpectedKey => write!(f, "{}: unexpected key", self.path),
            DifferenceKind::LengthMismatch { expected, actual } => write!(
                f,
                "{}: expected {} elements, got {}",
                self.path, expected, actual
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum JsonCompareError {
    #[error("response body is not valid json: {0}")]
    InvalidActual(#[source] serde_json::Error),
    #[error("expected json is invalid: {0}")]
    InvalidExpected(#[source] serde_json::Error),
    #[error("json mismatch: {}", join(.0))]
    Mismatch(Vec<Difference>),
}

fn join(differences: &[Difference]) -> String {
    differences
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
