use crate::{cookie, error::Error};
use hyper::{body::Bytes, HeaderMap, Method, StatusCode};
use std::{fmt, str::FromStr};

/// The request methods a scenario may send.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum HttpMethod {
    Options,
    Get,
    Head,
    Post,
    Put,
    Delete,
    Trace,
    Connect,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Options,
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Trace,
        HttpMethod::Connect,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Connect => "CONNECT",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .iter()
            .copied()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| Error::UnsupportedMethod(s.into()))
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Options => Method::OPTIONS,
            HttpMethod::Get => Method::GET,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Trace => Method::TRACE,
            HttpMethod::Connect => Method::CONNECT,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cookie queued for the next request.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RequestCookie {
    pub name: String,
    pub value: String,
    pub path: String,
}

/// A cookie set by the handler through a `Set-Cookie` header.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ResponseCookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub http_only: bool,
    pub secure: bool,
}

/// Everything the handler wrote for a single request.
#[derive(Debug, Clone)]
pub struct RecordedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    cookies: Vec<ResponseCookie>,
}

impl RecordedResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        let cookies = cookie::parse_set_cookies(&headers);

        Self {
            status,
            headers,
            body,
            cookies,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into()
    }

    pub fn cookies(&self) -> &[ResponseCookie] {
        &self.cookies
    }
}
