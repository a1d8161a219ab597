mod assertions;
mod configuration;
mod cookie;
mod data;
mod datatable;
mod error;
mod feature_context;
mod fixture;
mod handler;
mod recorder;
mod report;
mod request;
mod steps;
mod test_session;
mod util;

pub mod json_compare;
pub mod runner;

pub use configuration::{FeatureConfiguration, RedispatchPolicy};
pub use cookie::{parse_set_cookie, parse_set_cookies};
pub use data::{HttpMethod, RecordedResponse, RequestCookie, ResponseCookie};
pub use datatable::{
    CookieRow, DataTable, ExpectedCookieRow, ExpectedHeaderRow, FromTableRow, HeaderRow,
    TableOptions, TableRow,
};
pub use error::Error;
pub use feature_context::FeatureContext;
pub use feature_http_codegen::feature_test;
pub use fixture::{Fixture, FixturePhase};
pub use handler::{Handler, ServiceHandler};
pub use json_compare::MatchMode;
pub use recorder::ResponseRecorder;
pub use report::RunSummary;
pub use steps::{ArgumentKind, StepArgument, StepKind, StepMatch, StepRegistry};
pub use test_session::TestSession;
