//! Query and body decoding, run once per dispatched request.

mod encoding;
mod limit;
pub mod query;

use std::{collections::HashMap, fmt, string::FromUtf8Error};

use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

pub use encoding::Encoding;
pub use limit::Limit;

use crate::{
    http::{Body, HeaderMapExt, Payload, Request},
    Config, Error, Result,
};

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Failure to interpret a payload of a recognized content type. Never leaves
/// this module: the request continues without a body.
#[derive(Debug)]
pub enum DecodeError {
    Json(serde_json::Error),
    Text(FromUtf8Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(error) => write!(f, "invalid json body: {error}"),
            Self::Text(error) => write!(f, "invalid text body: {error}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Fills `request.params`, `request.query` and `request.body`.
///
/// Params are reset to an empty map and the query string is always parsed.
/// For methods other than GET the payload is read (bounded by
/// `config.limit`) and decoded by media type. Oversized payloads fail with
/// [`Error::PayloadTooLarge`]; undecodable ones leave the body unset.
pub async fn decode(request: &mut Request, config: &Config) -> Result<()> {
    request.params = HashMap::new();
    request.query = request.query_string().map(query::parse).unwrap_or_default();
    request.body = None;
    request.mark_decoded();

    if request.method.as_str().eq_ignore_ascii_case("get") || !config.parse_body {
        return Ok(());
    }
    let payload = match request.take_payload() {
        Some(payload) => payload,
        None => return Ok(()),
    };
    let limit = config.limit.bytes();
    if let Some(length) = request.get_content_length().filter(|length| *length > limit) {
        warn!(url = %request.url, length, limit, "declared body exceeds limit");
        return Err(Error::PayloadTooLarge { limit });
    }
    let bytes = match read_limited(payload, limit).await {
        Err(error @ Error::PayloadTooLarge { .. }) => {
            warn!(url = %request.url, limit, "body exceeds limit");
            return Err(error);
        }
        result => result?,
    };

    request.body = match parse_body(request, bytes, config.encoding) {
        Ok(body) => Some(body),
        Err(error) => {
            debug!(url = %request.url, "body ignored: {}", error);
            None
        }
    };
    Ok(())
}

fn parse_body(
    request: &Request,
    bytes: Vec<u8>,
    encoding: Encoding,
) -> std::result::Result<Body, DecodeError> {
    match request.media_type().as_deref() {
        Some(JSON) => serde_json::from_slice(&bytes)
            .map(Body::Json)
            .map_err(DecodeError::Json),
        Some(FORM) => Ok(Body::Form(query::parse(&String::from_utf8_lossy(&bytes)))),
        Some(media_type) if media_type.starts_with("text/") => request
            .content_type_param("charset")
            .and_then(|charset| Encoding::from_label(&charset))
            .unwrap_or(encoding)
            .decode(bytes)
            .map(Body::Text),
        _ => Ok(Body::Raw(bytes)),
    }
}

/// Reads the whole payload, buffering at most `limit + 1` bytes.
async fn read_limited(payload: Payload, limit: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    payload
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut bytes)
        .await?;
    if bytes.len() > limit {
        return Err(Error::PayloadTooLarge { limit });
    }
    Ok(bytes)
}
