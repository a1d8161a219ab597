//! The step phrases understood by [`FeatureContext`](crate::FeatureContext).
//!
//! Phrases are part of the contract with existing feature files and must not
//! change. Each [`StepKind`] owns one anchored pattern, the argument shape it
//! expects and a sample phrase used to check at construction time that no two
//! patterns claim the same text.

use crate::{datatable::DataTable, error::Error};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::{self, Display};

lazy_static! {
    static ref STANDARD_REGISTRY: StepRegistry =
        StepRegistry::new().expect("built-in step patterns are valid and unambiguous");
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ArgumentKind {
    None,
    Table,
    DocString,
}

impl Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentKind::None => write!(f, "no argument"),
            ArgumentKind::Table => write!(f, "a data table"),
            ArgumentKind::DocString => write!(f, "a doc string"),
        }
    }
}

/// The block attached below a step line.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StepArgument {
    None,
    Table(DataTable),
    DocString(String),
}

impl StepArgument {
    pub fn kind(&self) -> ArgumentKind {
        match self {
            StepArgument::None => ArgumentKind::None,
            StepArgument::Table(_) => ArgumentKind::Table,
            StepArgument::DocString(_) => ArgumentKind::DocString,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StepKind {
    SetRequestHeaders,
    SetRequestBody,
    SetRequestCookies,
    SendRequest,
    ResponseCode,
    ResponseBody,
    ResponsePattern,
    ResponseJson,
    ResponseJsonSubtree,
    ResponseHeaders,
    ResponseCookies,
}

impl StepKind {
    pub const ALL: [StepKind; 11] = [
        StepKind::SetRequestHeaders,
        StepKind::SetRequestBody,
        StepKind::SetRequestCookies,
        StepKind::SendRequest,
        StepKind::ResponseCode,
        StepKind::ResponseBody,
        StepKind::ResponsePattern,
        StepKind::ResponseJson,
        StepKind::ResponseJsonSubtree,
        StepKind::ResponseHeaders,
        StepKind::ResponseCookies,
    ];

    pub fn pattern(self) -> &'static str {
        match self {
            StepKind::SetRequestHeaders => r"^I have following request headers:$",
            StepKind::SetRequestBody => r"^I have following request body:$",
            StepKind::SetRequestCookies => r"^I have following request cookies:$",
            StepKind::SendRequest => {
                r#"^I send "(OPTIONS|GET|HEAD|POST|PUT|DELETE|TRACE|CONNECT)" request to "([^"]*)"$"#
            }
            StepKind::ResponseCode => r"^the response code should be (\d+)$",
            StepKind::ResponseBody => r"^the response should be:$",
            StepKind::ResponsePattern => r"^the response should match pattern:$",
            StepKind::ResponseJson => r"^the response should contain following json:$",
            StepKind::ResponseJsonSubtree => {
                r"^the response should contain following json subtree:$"
            }
            StepKind::ResponseHeaders => r"^the response should have following headers:$",
            StepKind::ResponseCookies => r"^the response should have following cookies:$",
        }
    }

    pub fn argument(self) -> ArgumentKind {
        match self {
            StepKind::SetRequestHeaders
            | StepKind::SetRequestCookies
            | StepKind::ResponseHeaders
            | StepKind::ResponseCookies => ArgumentKind::Table,
            StepKind::SetRequestBody
            | StepKind::ResponseBody
            | StepKind::ResponsePattern
            | StepKind::ResponseJson
            | StepKind::ResponseJsonSubtree => ArgumentKind::DocString,
            StepKind::SendRequest | StepKind::ResponseCode => ArgumentKind::None,
        }
    }

    /// A phrase this step, and only this step, accepts.
    pub fn sample(self) -> &'static str {
        match self {
            StepKind::SetRequestHeaders => "I have following request headers:",
            StepKind::SetRequestBody => "I have following request body:",
            StepKind::SetRequestCookies => "I have following request cookies:",
            StepKind::SendRequest => r#"I send "GET" request to "/""#,
            StepKind::ResponseCode => "the response code should be 200",
            StepKind::ResponseBody => "the response should be:",
            StepKind::ResponsePattern => "the response should match pattern:",
            StepKind::ResponseJson => "the response should contain following json:",
            StepKind::ResponseJsonSubtree => "the response should contain following json subtree:",
            StepKind::ResponseHeaders => "the response should have following headers:",
            StepKind::ResponseCookies => "the response should have following cookies:",
        }
    }
}

impl Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.pattern())
    }
}

#[derive(Debug)]
struct StepDefinition {
    kind: StepKind,
    regex: Regex,
}

/// A step resolved from its text, with the captured groups in order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StepMatch {
    pub kind: StepKind,
    pub captures: Vec<String>,
}

impl StepMatch {
    pub fn capture(&self, index: usize) -> &str {
        self.captures.get(index).map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct StepRegistry {
    definitions: Vec<StepDefinition>,
}

impl StepRegistry {
    /// Compiles every step pattern and checks that no sample phrase is
    /// claimed by more than one step.
    pub fn new() -> Result<Self, Error> {
        let definitions = StepKind::ALL
            .iter()
            .map(|&kind| {
                Ok(StepDefinition {
                    kind,
                    regex: Regex::new(kind.pattern())?,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        let registry = Self { definitions };

        for kind in StepKind::ALL.iter() {
            let step = registry.find(kind.sample())?;
            if step.kind != *kind {
                return Err(Error::AmbiguousStep {
                    text: kind.sample().into(),
                    first: step.kind.to_string(),
                    second: kind.to_string(),
                });
            }
        }

        Ok(registry)
    }

    /// The built-in registry, compiled once per process.
    pub fn standard() -> &'static StepRegistry {
        &STANDARD_REGISTRY
    }

    pub fn find(&self, text: &str) -> Result<StepMatch, Error> {
        let mut matches = self
            .definitions
            .iter()
            .filter_map(|definition| {
                definition
                    .regex
                    .captures(text)
                    .map(|captures| (definition.kind, captures))
            });

        let (kind, captures) = matches
            .next()
            .ok_or_else(|| Error::UndefinedStep(text.into()))?;

        if let Some((other, _)) = matches.next() {
            return Err(Error::AmbiguousStep {
                text: text.into(),
                first: kind.to_string(),
                second: other.to_string(),
            });
        }

        Ok(StepMatch {
            kind,
            captures: captures
                .iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn every_sample_resolves_to_its_own_step() {
        let registry = StepRegistry::standard();

        for kind in StepKind::ALL.iter() {
            assert_eq!(registry.find(kind.sample()).unwrap().kind, *kind);
        }
    }

    #[rstest]
    #[case("OPTIONS")]
    #[case("GET")]
    #[case("HEAD")]
    #[case("POST")]
    #[case("PUT")]
    #[case("DELETE")]
    #[case("TRACE")]
    #[case("CONNECT")]
    fn send_step_captures_method_and_url(#[case] method: &str) {
        let text = format!(r#"I send "{}" request to "/login?next=/home""#, method);

        let step = StepRegistry::standard().find(&text).unwrap();

        assert_eq!(step.kind, StepKind::SendRequest);
        assert_eq!(step.capture(0), method);
        assert_eq!(step.capture(1), "/login?next=/home");
    }

    #[rstest]
    #[case(r#"I send "PATCH" request to "/login""#)]
    #[case(r#"I send "get" request to "/login""#)]
    #[case("the response code should be two hundred")]
    #[case("I have following request headers")]
    #[case(" the response should be:")]
    fn unknown_phrases_are_undefined(#[case] text: &str) {
        assert!(matches!(
            StepRegistry::standard().find(text),
            Err(Error::UndefinedStep(_))
        ));
    }

    #[test]
    fn response_code_captures_digits() {
        let step = StepRegistry::standard()
            .find("the response code should be 405")
            .unwrap();

        assert_eq!(step.kind, StepKind::ResponseCode);
        assert_eq!(step.capture(0), "405");
    }

    #[rstest]
    #[case(StepKind::SetRequestHeaders, ArgumentKind::Table)]
    #[case(StepKind::SetRequestBody, ArgumentKind::DocString)]
    #[case(StepKind::SendRequest, ArgumentKind::None)]
    #[case(StepKind::ResponseCode, ArgumentKind::None)]
    #[case(StepKind::ResponseCookies, ArgumentKind::Table)]
    fn kinds_declare_their_argument(#[case] kind: StepKind, #[case] argument: ArgumentKind) {
        assert_eq!(kind.argument(), argument);
    }
}
