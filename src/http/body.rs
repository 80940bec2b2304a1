use std::collections::HashMap;

use serde_json::Value;

/// Request payload after content-type driven decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Form(HashMap<String, String>),
    Text(String),
    Raw(Vec<u8>),
}

impl Body {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_form(&self) -> Option<&HashMap<String, String>> {
        match self {
            Self::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// The value a middleware returns to answer a request.
///
/// Serializing it onto the wire is left to the transport adapter; see
/// [`Reply::content_type`] and [`Reply::into_bytes`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Json(Value),
    Bytes(Vec<u8>),
}

impl Reply {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Text(_) => "text/plain; charset=utf-8",
            Self::Json(_) => "application/json; charset=utf-8",
            Self::Bytes(_) => "application/octet-stream",
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Json(value) => value.to_string().into_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }
}

impl From<&str> for Reply {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Reply {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Vec<u8>> for Reply {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_reply_serialization() {
        let reply = Reply::from(json!({ "message": "Hello mike" }));
        assert_eq!(reply.content_type(), "application/json; charset=utf-8");
        assert_eq!(reply.into_bytes(), br#"{"message":"Hello mike"}"#.to_vec());
        assert_eq!(Reply::from("ok").into_bytes(), b"ok".to_vec());
    }

    #[test]
    fn test_body_accessors() {
        let body = Body::Text("hello".to_string());
        assert_eq!(body.as_text(), Some("hello"));
        assert_eq!(body.as_json(), None);
        assert_eq!(Body::Raw(vec![1, 2]).as_bytes(), Some(&[1u8, 2][..]));
    }
}
