use crate::error::LoginError;
use feature_http::{Handler, ResponseRecorder};
use hyper::{
    body::Bytes,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE},
    Method, Request, StatusCode,
};
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_SECRET: &str = "supersecret";
const AUTH_HEADER: &str = "x-auth";

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Builder used to build a LoginService instance
#[derive(Debug, Clone, Default)]
pub struct LoginServiceBuilder {
    secret: Option<String>,
    session_cookie: Option<String>,
}

impl LoginServiceBuilder {
    /// Create a new LoginServiceBuilder instance.
    pub fn new() -> Self {
        Self {
            secret: None,
            session_cookie: None,
        }
    }

    /// Use the given secret to authorize requests.
    ///
    /// # Arguments
    /// `secret` - the value expected in the `X-Auth` header.
    ///
    /// # Returns
    /// This builder.
    pub fn with_secret<T: Into<String>>(mut self, secret: T) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Hand out a session cookie on successful logins and accept it in place
    /// of the `X-Auth` header afterwards.
    ///
    /// # Arguments
    /// `name` - the name of the session cookie.
    ///
    /// # Returns
    /// This builder.
    pub fn with_session_cookie<T: Into<String>>(mut self, name: T) -> Self {
        self.session_cookie = Some(name.into());
        self
    }

    /// Consume the builder and create a LoginService instance using all of the previously configured values or
    /// their defaults.
    pub fn build(mut self) -> LoginService {
        LoginService {
            secret: self
                .secret
                .take()
                .unwrap_or_else(|| String::from(DEFAULT_SECRET)),
            session_cookie: self.session_cookie.take(),
        }
    }
}

/// A login endpoint that echoes the credentials payload of authorized
/// `POST` requests back as JSON.
#[derive(Debug, Clone)]
pub struct LoginService {
    secret: String,
    session_cookie: Option<String>,
}

impl LoginService {
    /// Create a LoginService that accepts [`DEFAULT_SECRET`] and sets no cookies.
    pub fn new() -> Self {
        LoginServiceBuilder::new().build()
    }

    /// Checks the request and decodes its JSON object payload.
    pub fn login(&self, request: &Request<Bytes>) -> Result<Map<String, Value>, LoginError> {
        if request.method() != Method::POST {
            return Err(LoginError::MethodNotAllowed(request.method().to_string()));
        }

        if !self.is_authorized(request.headers()) {
            return Err(LoginError::Unauthorized);
        }

        Ok(serde_json::from_slice(request.body())?)
    }

    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        if headers
            .get(AUTH_HEADER)
            .map_or(false, |value| value.as_bytes() == self.secret.as_bytes())
        {
            return true;
        }

        match &self.session_cookie {
            Some(name) => headers
                .get_all(COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .flat_map(|value| value.split(';'))
                .filter_map(|pair| pair.trim().split_once('='))
                .any(|(cookie, value)| cookie == name && value == self.secret),
            None => false,
        }
    }

    fn respond<T: Serialize>(recorder: &mut ResponseRecorder, status: StatusCode, body: &T) {
        recorder
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        recorder.write_status(status);

        if let Err(e) = serde_json::to_writer(&mut *recorder, body) {
            recorder.abort(format!("could not encode response: {}", e));
        }
    }
}

impl Default for LoginService {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for LoginService {
    fn serve(&mut self, request: &Request<Bytes>, recorder: &mut ResponseRecorder) {
        match self.login(request) {
            Ok(credentials) => {
                if let Some(name) = &self.session_cookie {
                    let cookie = format!("{}={}; Path=/; HttpOnly", name, self.secret);
                    if let Err(e) = recorder.append_header("Set-Cookie", &cookie) {
                        recorder.abort(e.to_string());
                        return;
                    }
                }

                tracing::debug!(fields = credentials.len(), "login accepted");
                Self::respond(recorder, StatusCode::OK, &credentials);
            }
            Err(e) => {
                let status = e.status();
                tracing::debug!(%status, error = %e, "login rejected");
                Self::respond(
                    recorder,
                    status,
                    &ErrorBody {
                        error: status.canonical_reason().unwrap_or_default(),
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_http::{feature_test, FeatureConfiguration};
    use rstest::rstest;

    fn configure_login(config: &mut FeatureConfiguration) -> LoginService {
        config.set_domain_name("http://login.test");
        LoginServiceBuilder::new()
            .with_session_cookie("session")
            .build()
    }

    #[feature_test("features/login.feature", configure_login)]
    fn login_feature() {}

    fn request(method: &str, auth: Option<&str>, body: &'static str) -> Request<Bytes> {
        let mut builder = Request::builder().method(method).uri("/login");
        if let Some(auth) = auth {
            builder = builder.header("X-Auth", auth);
        }
        builder.body(Bytes::from_static(body.as_bytes())).unwrap()
    }

    fn serve(service: &mut LoginService, request: &Request<Bytes>) -> (StatusCode, Value) {
        let mut recorder = ResponseRecorder::new();
        service.serve(request, &mut recorder);

        assert_eq!(recorder.headers()[CONTENT_TYPE], "application/json");
        (
            recorder.status(),
            serde_json::from_slice(recorder.body()).unwrap(),
        )
    }

    #[rstest]
    #[case("GET", Some(DEFAULT_SECRET), "", StatusCode::METHOD_NOT_ALLOWED, r#"{"error":"Method Not Allowed"}"#)]
    #[case("POST", None, r#"{"user":"a"}"#, StatusCode::UNAUTHORIZED, r#"{"error":"Unauthorized"}"#)]
    #[case("POST", Some("wrong"), r#"{"user":"a"}"#, StatusCode::UNAUTHORIZED, r#"{"error":"Unauthorized"}"#)]
    #[case("POST", Some(DEFAULT_SECRET), "", StatusCode::BAD_REQUEST, r#"{"error":"Bad Request"}"#)]
    #[case("POST", Some(DEFAULT_SECRET), "[1,2]", StatusCode::BAD_REQUEST, r#"{"error":"Bad Request"}"#)]
    #[case("POST", Some(DEFAULT_SECRET), r#"{"user":"a"}"#, StatusCode::OK, r#"{"user":"a"}"#)]
    fn responds_like_a_login_endpoint(
        #[case] method: &str,
        #[case] auth: Option<&str>,
        #[case] body: &'static str,
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let mut service = LoginService::new();

        let (actual_status, actual_body) = serve(&mut service, &request(method, auth, body));

        assert_eq!(actual_status, status);
        assert_eq!(actual_body, serde_json::from_str::<Value>(expected).unwrap());
    }

    #[test]
    fn session_cookie_replaces_the_auth_header() {
        let mut service = LoginServiceBuilder::new()
            .with_secret("s3cr3t")
            .with_session_cookie("session")
            .build();

        let mut recorder = ResponseRecorder::new();
        service.serve(&request("POST", Some("s3cr3t"), "{}"), &mut recorder);
        assert_eq!(
            recorder.headers()["set-cookie"],
            "session=s3cr3t; Path=/; HttpOnly"
        );

        let mut with_cookie = request("POST", None, "{}");
        with_cookie
            .headers_mut()
            .insert(COOKIE, HeaderValue::from_static("theme=dark; session=s3cr3t"));
        let (status, _) = serve(&mut service, &with_cookie);

        assert_eq!(status, StatusCode::OK);
    }
}
