#[cfg(test)]
mod tests {
    use feature_http::{
        feature_test, FeatureConfiguration, Handler, ResponseRecorder, ServiceHandler,
    };
    use hyper::{
        body::Bytes,
        header::{HeaderValue, CONTENT_TYPE, SET_COOKIE},
        service::service_fn,
        Body, Request, Response, StatusCode,
    };
    use login_service::LoginService;
    use serde_json::{json, Map, Value};
    use std::convert::Infallible;

    fn configure_login(_config: &mut FeatureConfiguration) -> LoginService {
        LoginService::new()
    }

    /// Describes the received request as JSON.
    fn echo(request: &Request<Bytes>, recorder: &mut ResponseRecorder) {
        let headers: Map<String, Value> = request
            .headers()
            .keys()
            .filter_map(|name| {
                let value = request.headers().get(name)?.to_str().ok()?;
                Some((name.to_string(), Value::from(value)))
            })
            .collect();
        let description = json!({
            "method": request.method().as_str(),
            "path": request.uri().path(),
            "headers": headers,
            "body": String::from_utf8_lossy(request.body()),
        });

        let headers = recorder.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(SET_COOKIE, HeaderValue::from_static("visited=yes; Path=/"));
        recorder.write_body(description.to_string().as_bytes());
    }

    fn configure_echo(config: &mut FeatureConfiguration) -> impl Handler {
        config.set_default_cookie_path("/echo");
        echo
    }

    fn configure_catalog(config: &mut FeatureConfiguration) -> impl Handler {
        config.set_domain_name("http://catalog.test");

        let service = service_fn(|request: Request<Body>| async move {
            let (status, body) = match request.uri().path() {
                "/catalog" => (StatusCode::OK, json!({
                    "total": 2,
                    "items": [
                        {"id": 1, "name": "kettle", "price": 25.0, "tags": ["kitchen"]},
                        {"id": 2, "name": "lamp", "price": 40.5, "tags": ["living", "light"]}
                    ],
                    "next": null
                })),
                _ => (StatusCode::NOT_FOUND, json!({"error": "Not Found"})),
            };

            Ok::<_, Infallible>(
                Response::builder()
                    .status(status)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
        });

        ServiceHandler::new(service).unwrap()
    }

    #[feature_test("features/login.feature", configure_login)]
    fn login() {}

    #[feature_test("features/request_state.feature", configure_echo)]
    fn request_state() {}

    #[feature_test("features/json.feature", configure_catalog)]
    fn json_documents() {}
}
