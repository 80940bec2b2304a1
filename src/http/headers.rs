use http::{
    header::{self, AsHeaderName, IntoHeaderName, InvalidHeaderValue},
    HeaderMap, HeaderValue,
};

/// Shared header accessors for [`super::Request`] and [`super::Response`].
pub trait HeaderMapExt {
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    fn header<K: AsHeaderName>(&self, key: K) -> Option<&HeaderValue> {
        self.headers().get(key)
    }

    fn insert_header<K, V>(&mut self, key: K, value: V) -> Result<(), InvalidHeaderValue>
    where
        K: IntoHeaderName,
        V: TryInto<HeaderValue, Error = InvalidHeaderValue>,
    {
        self.headers_mut().insert(key, value.try_into()?);
        Ok(())
    }

    fn get_content_length(&self) -> Option<usize> {
        self.header(header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
    }

    /// Media type of the `Content-Type` header, lower-cased and without parameters.
    fn media_type(&self) -> Option<String> {
        self.header(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|essence| essence.trim().to_ascii_lowercase())
            .filter(|essence| !essence.is_empty())
    }

    /// A named parameter of the `Content-Type` header, e.g. `charset`.
    fn content_type_param(&self, name: &str) -> Option<String> {
        self.header(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())?
            .split(';')
            .skip(1)
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim().trim_matches('"').to_string())
    }
}
