use crate::{data::RecordedResponse, error::Error, util};
use hyper::{body::Bytes, HeaderMap, StatusCode};
use std::io;

/// Response sink handed to the handler under test.
///
/// Mirrors what a real connection would see: the first status written wins,
/// and writing body bytes before any status implies `200 OK`. A recorder
/// that is never written to also reports `200 OK` with an empty body.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
    aborted: Option<String>,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Replaces the named header, validating the name and value.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<&mut Self, Error> {
        util::put_headers(&mut self.headers, [(name, value)])?;
        Ok(self)
    }

    /// Adds a value without touching earlier ones, e.g. a second `Set-Cookie`.
    pub fn append_header(&mut self, name: &str, value: &str) -> Result<&mut Self, Error> {
        self.headers
            .append(util::header_name(name)?, util::header_value(name, value)?);
        Ok(self)
    }

    pub fn write_status(&mut self, status: StatusCode) {
        match self.status {
            Some(written) if written != status => {
                tracing::debug!(%written, ignored = %status, "superfluous status write")
            }
            Some(_) => {}
            None => self.status = Some(status),
        }
    }

    pub fn write_body(&mut self, bytes: &[u8]) {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(bytes);
    }

    /// Marks the response as unusable; sending the request then fails with
    /// [`Error::HandlerAborted`].
    pub fn abort<S: Into<String>>(&mut self, reason: S) {
        self.aborted = Some(reason.into());
    }

    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub(crate) fn finish(self) -> Result<RecordedResponse, Error> {
        if let Some(reason) = self.aborted {
            return Err(Error::HandlerAborted(reason));
        }

        Ok(RecordedResponse::new(
            self.status.unwrap_or(StatusCode::OK),
            self.headers,
            Bytes::from(self.body),
        ))
    }
}

impl io::Write for ResponseRecorder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_body(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
