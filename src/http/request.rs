use std::{collections::HashMap, fmt, io::Cursor};

use http::{header::IntoHeaderName, HeaderMap, HeaderValue, Method};
use tokio::io::AsyncRead;

use super::{headers::HeaderMapExt, Body};

/// Unread request payload, as handed over by the transport.
pub type Payload = Box<dyn AsyncRead + Send + Unpin>;

pub struct Request {
    pub method: Method,
    /// Path and query string, as received.
    pub url: String,
    headers: HeaderMap,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Option<Body>,
    payload: Option<Payload>,
    decoded: bool,
}

impl Request {
    pub fn new<U: Into<String>>(method: Method, url: U) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            params: HashMap::new(),
            query: HashMap::new(),
            body: None,
            payload: None,
            decoded: false,
        }
    }

    pub fn with_header<K: IntoHeaderName>(mut self, key: K, value: HeaderValue) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn with_payload<B: Into<Vec<u8>>>(self, payload: B) -> Self {
        self.with_reader(Cursor::new(payload.into()))
    }

    pub fn with_reader<R: AsyncRead + Send + Unpin + 'static>(mut self, reader: R) -> Self {
        self.payload = Some(Box::new(reader));
        self
    }

    pub fn path(&self) -> &str {
        self.url
            .split_once('?')
            .map_or(self.url.as_str(), |(path, _)| path)
    }

    pub fn query_string(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub(crate) fn take_payload(&mut self) -> Option<Payload> {
        self.payload.take()
    }

    pub(crate) fn is_decoded(&self) -> bool {
        self.decoded
    }

    pub(crate) fn mark_decoded(&mut self) {
        self.decoded = true;
    }
}

impl HeaderMapExt for Request {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("params", &self.params)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("payload", &self.payload.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_path_and_query() {
        let request = Request::new(Method::GET, "/hello/with/params?hello=world");
        assert_eq!(request.path(), "/hello/with/params");
        assert_eq!(request.query_string(), Some("hello=world"));

        let request = Request::new(Method::GET, "/hello");
        assert_eq!(request.path(), "/hello");
        assert_eq!(request.query_string(), None);
    }
}
