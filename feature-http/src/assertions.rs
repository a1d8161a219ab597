//! Checks over a captured response. Every check is read-only and independent
//! of the others.

use crate::{
    data::RecordedResponse,
    datatable::{ExpectedCookieRow, ExpectedHeaderRow},
    error::Error,
    json_compare::{Comparator, MatchMode},
    util,
};
use regex::bytes::Regex;

pub fn status_code(response: &RecordedResponse, expected: u16) -> Result<(), Error> {
    let actual = response.status().as_u16();

    if actual != expected {
        return Err(Error::StatusMismatch { expected, actual });
    }

    Ok(())
}

pub fn body_equals(response: &RecordedResponse, expected: &str) -> Result<(), Error> {
    if response.body().as_ref() != expected.as_bytes() {
        return Err(Error::BodyMismatch {
            expected: expected.into(),
            actual: response.body_text(),
        });
    }

    Ok(())
}

/// Succeeds when the pattern matches anywhere in the raw body.
pub fn body_matches(response: &RecordedResponse, pattern: &str) -> Result<(), Error> {
    let regex = Regex::new(pattern)?;

    if !regex.is_match(response.body()) {
        return Err(Error::PatternMismatch {
            body: response.body_text(),
            pattern: pattern.into(),
        });
    }

    Ok(())
}

pub fn json(response: &RecordedResponse, expected: &str, mode: MatchMode) -> Result<(), Error> {
    Comparator::new(mode).compare(response.body(), expected.as_bytes())?;
    Ok(())
}

pub fn headers(response: &RecordedResponse, expected: &[ExpectedHeaderRow]) -> Result<(), Error> {
    for row in expected {
        let actual = util::first_header_value(response.headers(), &row.name)?
            .ok_or_else(|| Error::HeaderMissing(row.name.clone()))?;

        if let Some(value) = &row.value {
            if *value != actual {
                return Err(Error::HeaderValueMismatch {
                    name: row.name.clone(),
                    expected: value.clone(),
                    actual,
                });
            }
        }
    }

    Ok(())
}

/// Looks up each expected cookie by name; the first cookie with a matching
/// name decides whether an expected value holds.
pub fn cookies(response: &RecordedResponse, expected: &[ExpectedCookieRow]) -> Result<(), Error> {
    for row in expected {
        let cookie = response
            .cookies()
            .iter()
            .find(|cookie| cookie.name == row.name)
            .ok_or_else(|| Error::CookieNotFound(row.name.clone()))?;

        if let Some(value) = &row.value {
            if *value != cookie.value {
                return Err(Error::CookieValueMismatch {
                    name: row.name.clone(),
                    expected: value.clone(),
                    actual: cookie.value.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_compare::error::JsonCompareError;
    use hyper::{
        body::Bytes,
        header::{HeaderValue, CONTENT_TYPE, SET_COOKIE},
        HeaderMap, StatusCode,
    };
    use rstest::{fixture, rstest};

    #[fixture]
    fn response() -> RecordedResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.append(SET_COOKIE, HeaderValue::from_static("session=abc; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("theme=dark"));

        RecordedResponse::new(
            StatusCode::OK,
            headers,
            Bytes::from_static(br#"{"user":"a","roles":["admin"]}"#),
        )
    }

    fn header(name: &str, value: Option<&str>) -> ExpectedHeaderRow {
        ExpectedHeaderRow {
            name: name.into(),
            value: value.map(Into::into),
        }
    }

    fn cookie(name: &str, value: Option<&str>) -> ExpectedCookieRow {
        ExpectedCookieRow {
            name: name.into(),
            value: value.map(Into::into),
        }
    }

    #[rstest]
    fn status_mismatch_names_both_codes(response: RecordedResponse) {
        let error = status_code(&response, 401).unwrap_err();

        assert_eq!(
            error.to_string(),
            "expected response code to be 401, got 200"
        );
    }

    #[rstest]
    fn body_comparison_is_byte_exact(response: RecordedResponse) {
        assert!(body_equals(&response, r#"{"user":"a","roles":["admin"]}"#).is_ok());

        let error = body_equals(&response, r#"{"user": "a", "roles": ["admin"]}"#).unwrap_err();
        assert!(matches!(error, Error::BodyMismatch { .. }));
    }

    #[rstest]
    #[case(r#""user":"\w+""#, true)]
    #[case("roles", true)]
    #[case("^admin", false)]
    fn pattern_matches_anywhere_in_body(
        response: RecordedResponse,
        #[case] pattern: &str,
        #[case] matches: bool,
    ) {
        assert_eq!(body_matches(&response, pattern).is_ok(), matches);
    }

    #[rstest]
    fn invalid_pattern_is_a_step_error(response: RecordedResponse) {
        assert!(matches!(
            body_matches(&response, "(unclosed"),
            Err(Error::InvalidPattern(_))
        ));
    }

    #[rstest]
    fn json_modes(response: RecordedResponse) {
        assert!(json(&response, r#"{"user":"a"}"#, MatchMode::Subtree).is_ok());
        assert!(matches!(
            json(&response, r#"{"user":"a"}"#, MatchMode::Strict),
            Err(Error::Json(JsonCompareError::Mismatch(_)))
        ));
        assert!(json(
            &response,
            r#"{"roles":["admin"],"user":"a"}"#,
            MatchMode::Strict
        )
        .is_ok());
    }

    #[rstest]
    fn header_presence_and_value(response: RecordedResponse) {
        assert!(headers(
            &response,
            &[
                header("Content-Type", Some("application/json")),
                header("content-type", None),
            ],
        )
        .is_ok());

        assert!(matches!(
            headers(&response, &[header("X-Missing", None)]),
            Err(Error::HeaderMissing(name)) if name == "X-Missing"
        ));
        assert!(matches!(
            headers(&response, &[header("Content-Type", Some("text/plain"))]),
            Err(Error::HeaderValueMismatch { actual, .. }) if actual == "application/json"
        ));
    }

    #[rstest]
    fn cookie_presence_and_value(response: RecordedResponse) {
        assert!(cookies(
            &response,
            &[cookie("theme", Some("dark")), cookie("session", None)]
        )
        .is_ok());

        assert!(matches!(
            cookies(&response, &[cookie("session", Some("other"))]),
            Err(Error::CookieValueMismatch { expected, actual, .. })
                if expected == "other" && actual == "abc"
        ));
    }

    #[test]
    fn cookie_assertion_without_cookies_is_not_found() {
        let response = RecordedResponse::new(StatusCode::OK, HeaderMap::new(), Bytes::new());

        assert!(matches!(
            cookies(&response, &[cookie("session", None)]),
            Err(Error::CookieNotFound(name)) if name == "session"
        ));
    }
}
