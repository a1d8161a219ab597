use crate::{
    configuration::FeatureConfiguration, cookie, data::HttpMethod, error::Error,
    fixture::Fixture,
};
use hyper::{body::Bytes, header, Method, Request, Uri};

/// Builds the request described by the fixture's pending state.
pub fn build_request(
    method: HttpMethod,
    url: &str,
    fixture: &Fixture,
    configuration: &FeatureConfiguration,
) -> Result<Request<Bytes>, Error> {
    let uri = request_uri(url, configuration)?;
    let body = fixture.body().cloned().unwrap_or_default();

    let mut request = Request::new(body);
    *request.method_mut() = Method::from(method);
    *request.uri_mut() = uri;

    let headers = if fixture.headers().is_empty() {
        configuration.default_headers()
    } else {
        fixture.headers()
    };
    *request.headers_mut() = headers.clone();

    if !fixture.cookies().is_empty() {
        let value = cookie::cookie_header(
            request.headers().get(header::COOKIE),
            fixture.cookies(),
        )?;
        request.headers_mut().insert(header::COOKIE, value);
    }

    Ok(request)
}

fn request_uri(url: &str, configuration: &FeatureConfiguration) -> Result<Uri, Error> {
    let url = match configuration.domain_name() {
        Some(domain_name) if !url.contains("://") => format!("{}{}", domain_name, url),
        _ => url.to_string(),
    };

    url.parse::<Uri>().map_err(|source| Error::InvalidUri {
        uri: url.clone(),
        source,
    })
}
