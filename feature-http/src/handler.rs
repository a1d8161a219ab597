use crate::{error::Error, recorder::ResponseRecorder};
use futures::future;
use hyper::{
    body::{self, Bytes},
    service::Service,
    Body, Request, Response,
};
use std::fmt::{self, Debug, Display};
use tokio::runtime::{self, Handle, Runtime};

/// The component under test.
///
/// A handler receives the fully built request and writes its status, headers
/// and body into the recorder before returning. Any closure with the matching
/// signature is a handler.
pub trait Handler {
    fn serve(&mut self, request: &Request<Bytes>, recorder: &mut ResponseRecorder);
}

impl<F> Handler for F
where
    F: FnMut(&Request<Bytes>, &mut ResponseRecorder),
{
    fn serve(&mut self, request: &Request<Bytes>, recorder: &mut ResponseRecorder) {
        self(request, recorder)
    }
}

/// Runs a hyper service (a router, a middleware stack) as a [`Handler`].
///
/// Each request is driven to completion on a private current-thread runtime,
/// so the calling step still blocks until the response body is complete.
///
/// Tokio can not block on a runtime from inside another one. Serving from
/// within an async context, such as a `#[tokio::test]`, aborts the recording
/// instead of sending the request. Create and drop the handler outside of any
/// runtime as well.
pub struct ServiceHandler<S> {
    service: S,
    runtime: Runtime,
}

impl<S> ServiceHandler<S> {
    pub fn new(service: S) -> Result<Self, Error> {
        let runtime = runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self { service, runtime })
    }
}

impl<S> Debug for ServiceHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandler").finish_non_exhaustive()
    }
}

impl<S> Handler for ServiceHandler<S>
where
    S: Service<Request<Body>, Response = Response<Body>>,
    S::Error: Display,
{
    fn serve(&mut self, request: &Request<Bytes>, recorder: &mut ResponseRecorder) {
        if Handle::try_current().is_ok() {
            let reason = "ServiceHandler can not run inside a tokio runtime, \
                          run the feature from a plain #[test]";
            tracing::error!(reason, "handler service was not called");
            recorder.abort(reason);
            return;
        }

        let Self { service, runtime } = self;

        let result = runtime.block_on(async {
            future::poll_fn(|cx| service.poll_ready(cx))
                .await
                .map_err(|e| format!("service not ready: {}", e))?;
            let response = service
                .call(to_hyper_request(request))
                .await
                .map_err(|e| format!("service failed: {}", e))?;
            let (parts, body) = response.into_parts();
            let body = body::to_bytes(body)
                .await
                .map_err(|e| format!("reading response body failed: {}", e))?;

            Ok::<_, String>((parts, body))
        });

        match result {
            Ok((parts, body)) => {
                recorder.write_status(parts.status);
                recorder.headers_mut().extend(parts.headers);
                recorder.write_body(&body);
            }
            Err(reason) => {
                tracing::error!(%reason, "handler service did not produce a response");
                recorder.abort(reason);
            }
        }
    }
}

fn to_hyper_request(request: &Request<Bytes>) -> Request<Body> {
    let mut hyper_request = Request::new(Body::from(request.body().clone()));
    *hyper_request.method_mut() = request.method().clone();
    *hyper_request.uri_mut() = request.uri().clone();
    *hyper_request.version_mut() = request.version();
    *hyper_request.headers_mut() = request.headers().clone();
    hyper_request
}
