use crate::error::Error;
use hyper::{
    header::{HeaderName, HeaderValue},
    HeaderMap,
};

pub fn header_name(name: &str) -> Result<HeaderName, Error> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| Error::InvalidHeaderName(name.into()))
}

pub fn header_value(name: &str, value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|_| Error::InvalidHeaderValue(name.into()))
}

/// Inserts each header, replacing any earlier value under the same name.
///
/// Nothing is inserted unless every name and value is valid.
pub fn put_headers<'a, I: IntoIterator<Item = (&'a str, &'a str)>>(
    header_map: &mut HeaderMap<HeaderValue>,
    headers: I,
) -> Result<(), Error> {
    let headers = headers
        .into_iter()
        .map(|(key, value)| Ok((header_name(key)?, header_value(key, value)?)))
        .collect::<Result<Vec<_>, Error>>()?;

    for (name, value) in headers {
        header_map.insert(name, value);
    }

    Ok(())
}

/// First value of the named header. Values with opaque bytes are decoded lossily.
pub fn first_header_value(header_map: &HeaderMap, name: &str) -> Result<Option<String>, Error> {
    let name = header_name(name)?;

    Ok(header_map
        .get(&name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_headers_replace_earlier_ones() {
        let mut headers = HeaderMap::new();
        put_headers(
            &mut headers,
            [("X-Auth", "first"), ("Accept", "*/*"), ("x-auth", "second")],
        )
        .unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers["x-auth"], "second");
    }

    #[test]
    fn reads_first_value_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.append("vary", HeaderValue::from_static("accept"));
        headers.append("vary", HeaderValue::from_static("cookie"));

        assert_eq!(
            first_header_value(&headers, "Vary").unwrap().as_deref(),
            Some("accept")
        );
        assert_eq!(first_header_value(&headers, "Missing").unwrap(), None);
    }

    #[test]
    fn rejects_invalid_names() {
        let mut headers = HeaderMap::new();
        let result = put_headers(&mut headers, [("bad header", "x")]);

        assert!(matches!(result, Err(Error::InvalidHeaderName(name)) if name == "bad header"));
    }

    #[test]
    fn invalid_rows_leave_the_map_untouched() {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("*/*"));

        let result = put_headers(
            &mut headers,
            [("X-Ok", "1"), ("Accept", "text/plain"), ("bad name", "2")],
        );

        assert!(matches!(result, Err(Error::InvalidHeaderName(name)) if name == "bad name"));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["accept"], "*/*");
    }
}
