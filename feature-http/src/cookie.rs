use crate::{
    data::{RequestCookie, ResponseCookie},
    error::Error,
};
use hyper::{
    header::{self, HeaderValue},
    HeaderMap,
};

/// Parses every `Set-Cookie` header in order. Malformed headers are skipped.
pub fn parse_set_cookies(headers: &HeaderMap) -> Vec<ResponseCookie> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(parse_set_cookie)
        .collect()
}

/// Parses a single `Set-Cookie` header value.
pub fn parse_set_cookie(header: &str) -> Option<ResponseCookie> {
    let mut parts = header.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();

    if !is_token(name) {
        return None;
    }

    let mut cookie = ResponseCookie {
        name: name.into(),
        value: unquote(value.trim()).into(),
        ..ResponseCookie::default()
    };

    for part in parts {
        let part = part.trim();
        match part.split_once('=') {
            Some((attribute, value)) => match attribute.trim().to_lowercase().as_str() {
                "path" => cookie.path = Some(value.trim().into()),
                "domain" => cookie.domain = Some(value.trim().trim_start_matches('.').into()),
                _ => {}
            },
            None => match part.to_lowercase().as_str() {
                "httponly" => cookie.http_only = true,
                "secure" => cookie.secure = true,
                _ => {}
            },
        }
    }

    Some(cookie)
}

/// Builds the `Cookie` request header, appending to an existing one.
pub fn cookie_header(
    existing: Option<&HeaderValue>,
    cookies: &[RequestCookie],
) -> Result<HeaderValue, Error> {
    let mut pairs = Vec::with_capacity(cookies.len() + 1);

    if let Some(existing) = existing {
        let existing = existing
            .to_str()
            .map_err(|_| Error::InvalidHeaderValue(header::COOKIE.to_string()))?;
        if !existing.is_empty() {
            pairs.push(existing.to_string());
        }
    }

    for cookie in cookies {
        if !is_token(&cookie.name) || cookie.value.contains(';') {
            return Err(Error::InvalidCookie(cookie.name.clone()));
        }
        pairs.push(format!("{}={}", cookie.name, cookie.value));
    }

    HeaderValue::from_str(&pairs.join("; "))
        .map_err(|_| Error::InvalidHeaderValue(header::COOKIE.to_string()))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

// RFC 7230 token characters.
fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}
