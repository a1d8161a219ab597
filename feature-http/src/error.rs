use crate::{json_compare::error::JsonCompareError, steps::ArgumentKind};
use hyper::http;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // table and argument shape
    #[error("table row {row} is missing required field {field:?}")]
    MissingField { field: String, row: usize },
    #[error("table row {row} has unknown field {field:?}")]
    UnknownField { field: String, row: usize },
    #[error("table has no header row")]
    EmptyTable,
    #[error("table row {row} has {actual} cells, the header declares {expected}")]
    RaggedTable {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("step {step:?} expects {expected}, got {actual}")]
    ArgumentMismatch {
        step: String,
        expected: ArgumentKind,
        actual: ArgumentKind,
    },

    // request construction
    #[error("unsupported http method {0:?}")]
    UnsupportedMethod(String),
    #[error("invalid request uri {uri:?}: {source}")]
    InvalidUri {
        uri: String,
        source: http::uri::InvalidUri,
    },
    #[error("invalid status code {0:?}")]
    InvalidStatusCode(String),
    #[error("invalid header name {0:?}")]
    InvalidHeaderName(String),
    #[error("invalid value for header {0:?}")]
    InvalidHeaderValue(String),
    #[error("invalid cookie {0:?}")]
    InvalidCookie(String),
    #[error("a request was already sent in this scenario")]
    AlreadyDispatched,
    #[error("handler aborted the response: {0}")]
    HandlerAborted(String),

    // response assertions
    #[error("no request has been sent in this scenario")]
    NotDispatched,
    #[error("expected response code to be {expected}, got {actual}")]
    StatusMismatch { expected: u16, actual: u16 },
    #[error("expected response body to be {expected:?}, got {actual:?}")]
    BodyMismatch { expected: String, actual: String },
    #[error("expected response body {body:?} to match pattern {pattern:?}, but it did not")]
    PatternMismatch { body: String, pattern: String },
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error(transparent)]
    Json(#[from] JsonCompareError),
    #[error("header {0:?} missing")]
    HeaderMissing(String),
    #[error("expected value {expected:?} for header {name:?}, got {actual:?}")]
    HeaderValueMismatch {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("cookie {0:?} not found")]
    CookieNotFound(String),
    #[error("wrong value for cookie {name:?}, got {actual:?}, want {expected:?}")]
    CookieValueMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    // step registry and feature files
    #[error("undefined step {0:?}")]
    UndefinedStep(String),
    #[error("step {text:?} matches both {first} and {second}")]
    AmbiguousStep {
        text: String,
        first: String,
        second: String,
    },
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
}
