use crate::{
    data::{RecordedResponse, RequestCookie},
    error::Error,
};
use hyper::{body::Bytes, HeaderMap};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FixturePhase {
    /// Given steps are shaping the request, nothing was sent yet.
    AwaitingDispatch,
    /// A response was captured and can be asserted on.
    Dispatched,
}

/// Per-scenario request state and the response captured for it.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    headers: HeaderMap,
    cookies: Vec<RequestCookie>,
    body: Option<Bytes>,
    response: Option<RecordedResponse>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn phase(&self) -> FixturePhase {
        match self.response {
            Some(_) => FixturePhase::Dispatched,
            None => FixturePhase::AwaitingDispatch,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
            && self.cookies.is_empty()
            && self.body.is_none()
            && self.response.is_none()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn cookies(&self) -> &[RequestCookie] {
        &self.cookies
    }

    pub fn add_cookie(&mut self, cookie: RequestCookie) {
        self.cookies.push(cookie);
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn set_body<B: Into<Bytes>>(&mut self, body: B) {
        self.body = Some(body.into());
    }

    pub fn set_response(&mut self, response: RecordedResponse) {
        self.response = Some(response);
    }

    /// The captured response, or [`Error::NotDispatched`] before the request
    /// was sent.
    pub fn response(&self) -> Result<&RecordedResponse, Error> {
        self.response.as_ref().ok_or(Error::NotDispatched)
    }
}
