use crate::{
    assertions,
    configuration::{FeatureConfiguration, RedispatchPolicy},
    data::{HttpMethod, RequestCookie},
    datatable::{CookieRow, DataTable, ExpectedCookieRow, ExpectedHeaderRow, HeaderRow},
    error::Error,
    fixture::{Fixture, FixturePhase},
    handler::Handler,
    json_compare::MatchMode,
    recorder::ResponseRecorder,
    request, util,
    steps::{StepArgument, StepKind, StepRegistry},
};
use hyper::{body::Bytes, Request};
use std::fmt::{self, Debug};

/// Binds the step phrases to a handler under test.
///
/// A context owns the handler, the configuration and the fixture of the
/// scenario currently running. It is the `cucumber` world of
/// [`crate::runner`], which builds a fresh one for every scenario. Reuse a
/// context across scenarios by calling [`reset`](Self::reset) in between.
#[derive(cucumber::World)]
#[world(init = Self::unconfigured)]
pub struct FeatureContext {
    handler: Box<dyn Handler>,
    configuration: FeatureConfiguration,
    fixture: Fixture,
    registry: &'static StepRegistry,
}

impl FeatureContext {
    pub fn new<H: Handler + 'static>(handler: H) -> Self {
        Self::with_configuration(handler, FeatureConfiguration::new())
    }

    pub fn with_configuration<H: Handler + 'static>(
        handler: H,
        configuration: FeatureConfiguration,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            configuration,
            fixture: Fixture::new(),
            registry: StepRegistry::standard(),
        }
    }

    /// A context whose handler aborts every request. The runner replaces it
    /// before the first step of a scenario.
    pub(crate) fn unconfigured() -> Self {
        Self::new(|_: &Request<Bytes>, recorder: &mut ResponseRecorder| {
            recorder.abort("no handler configured for this scenario");
        })
    }

    pub fn configuration(&self) -> &FeatureConfiguration {
        &self.configuration
    }

    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    /// Clears pending request state and the captured response.
    pub fn reset(&mut self) {
        self.fixture.reset();
    }

    /// Resolves `text` against the step phrases and runs the matching step.
    pub fn run_step(&mut self, text: &str, argument: StepArgument) -> Result<(), Error> {
        let step = self.registry.find(text)?;

        if step.kind.argument() != argument.kind() {
            return Err(Error::ArgumentMismatch {
                step: text.into(),
                expected: step.kind.argument(),
                actual: argument.kind(),
            });
        }

        tracing::debug!(step = ?step.kind, text, "running step");

        match (step.kind, argument) {
            (StepKind::SetRequestHeaders, StepArgument::Table(table)) => {
                self.set_request_headers(&table)
            }
            (StepKind::SetRequestCookies, StepArgument::Table(table)) => {
                self.set_request_cookies(&table)
            }
            (StepKind::SetRequestBody, StepArgument::DocString(body)) => {
                self.set_request_body(body);
                Ok(())
            }
            (StepKind::SendRequest, StepArgument::None) => {
                let method: HttpMethod = step.capture(0).parse()?;
                self.send_request(method, step.capture(1))
            }
            (StepKind::ResponseCode, StepArgument::None) => {
                let code = step.capture(0);
                let code = code
                    .parse::<u16>()
                    .map_err(|_| Error::InvalidStatusCode(code.into()))?;
                self.assert_response_code(code)
            }
            (StepKind::ResponseBody, StepArgument::DocString(body)) => {
                self.assert_response_body(&body)
            }
            (StepKind::ResponsePattern, StepArgument::DocString(pattern)) => {
                self.assert_response_matches(&pattern)
            }
            (StepKind::ResponseJson, StepArgument::DocString(json)) => {
                self.assert_response_json(&json, MatchMode::Strict)
            }
            (StepKind::ResponseJsonSubtree, StepArgument::DocString(json)) => {
                self.assert_response_json(&json, MatchMode::Subtree)
            }
            (StepKind::ResponseHeaders, StepArgument::Table(table)) => {
                self.assert_response_headers(&table)
            }
            (StepKind::ResponseCookies, StepArgument::Table(table)) => {
                self.assert_response_cookies(&table)
            }
            (kind, argument) => Err(Error::ArgumentMismatch {
                step: text.into(),
                expected: kind.argument(),
                actual: argument.kind(),
            }),
        }
    }

    pub fn set_request_headers(&mut self, table: &DataTable) -> Result<(), Error> {
        let rows: Vec<HeaderRow> = table.parse()?;

        util::put_headers(
            self.fixture.headers_mut(),
            rows.iter().map(|row| (row.name.as_str(), row.value.as_str())),
        )
    }

    pub fn set_request_cookies(&mut self, table: &DataTable) -> Result<(), Error> {
        let rows: Vec<CookieRow> = table.parse()?;
        let default_path = self.configuration.default_cookie_path();

        for row in rows {
            let cookie = RequestCookie {
                name: row.name,
                value: row.value,
                path: row.path.unwrap_or_else(|| default_path.into()),
            };
            self.fixture.add_cookie(cookie);
        }

        Ok(())
    }

    pub fn set_request_body<S: Into<String>>(&mut self, body: S) {
        self.fixture.set_body(body.into());
    }

    /// Builds the request from the pending state, hands it to the handler and
    /// captures the response.
    pub fn send_request(&mut self, method: HttpMethod, url: &str) -> Result<(), Error> {
        if self.fixture.phase() == FixturePhase::Dispatched {
            match self.configuration.redispatch_policy() {
                RedispatchPolicy::Reject => return Err(Error::AlreadyDispatched),
                RedispatchPolicy::Overwrite => tracing::warn!(
                    %method,
                    url,
                    "a request was already sent in this scenario, replacing its response"
                ),
            }
        }

        let request = request::build_request(method, url, &self.fixture, &self.configuration)?;
        let mut recorder = ResponseRecorder::new();

        self.handler.serve(&request, &mut recorder);

        let response = recorder.finish()?;
        tracing::info!(
            %method,
            uri = %request.uri(),
            status = response.status().as_u16(),
            "request dispatched"
        );
        self.fixture.set_response(response);

        Ok(())
    }

    pub fn assert_response_code(&self, code: u16) -> Result<(), Error> {
        assertions::status_code(self.fixture.response()?, code)
    }

    pub fn assert_response_body(&self, expected: &str) -> Result<(), Error> {
        assertions::body_equals(self.fixture.response()?, expected)
    }

    pub fn assert_response_matches(&self, pattern: &str) -> Result<(), Error> {
        assertions::body_matches(self.fixture.response()?, pattern)
    }

    pub fn assert_response_json(&self, expected: &str, mode: MatchMode) -> Result<(), Error> {
        assertions::json(self.fixture.response()?, expected, mode)
    }

    pub fn assert_response_headers(&self, table: &DataTable) -> Result<(), Error> {
        let rows: Vec<ExpectedHeaderRow> = table.parse()?;
        assertions::headers(self.fixture.response()?, &rows)
    }

    pub fn assert_response_cookies(&self, table: &DataTable) -> Result<(), Error> {
        let rows: Vec<ExpectedCookieRow> = table.parse()?;
        assertions::cookies(self.fixture.response()?, &rows)
    }
}

impl Debug for FeatureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureContext")
            .field("configuration", &self.configuration)
            .field("fixture", &self.fixture)
            .finish_non_exhaustive()
    }
}
