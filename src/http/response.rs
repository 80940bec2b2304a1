use http::{header, HeaderMap, HeaderValue, StatusCode};

use super::{headers::HeaderMapExt, Reply};
use crate::{Error, Result};

/// Write-once response handle shared with middlewares.
///
/// A middleware may answer a request directly by calling [`Response::send`]
/// instead of returning a [`Reply`]; the dispatcher checks
/// [`Response::headers_sent`] after every middleware.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    headers_sent: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: None,
            headers_sent: false,
        }
    }

    pub fn headers_sent(&self) -> bool {
        self.headers_sent
    }

    pub fn send<B: Into<Vec<u8>>>(&mut self, status: StatusCode, body: B) -> Result<()> {
        if self.headers_sent {
            return Err(Error::AlreadySent);
        }
        let body = body.into();
        self.status = status;
        self.headers
            .insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
        self.body = Some(body);
        self.headers_sent = true;
        Ok(())
    }

    pub fn send_reply(&mut self, status: StatusCode, reply: Reply) -> Result<()> {
        if self.headers_sent {
            return Err(Error::AlreadySent);
        }
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(reply.content_type()),
        );
        self.send(status, reply.into_bytes())
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

impl HeaderMapExt for Response {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}
