use serde::Deserialize;

use crate::{
    decode::{Encoding, Limit},
    RouteMethod,
};

/// Router options, deserializable from the same keys the factory accepts:
/// `limit`, `encoding`, `parseBody` and `acceptedMethods`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Largest request body read, in bytes or as a string such as `"1mb"`.
    pub limit: Limit,
    /// Charset used for `text/*` bodies without a recognized `charset`.
    pub encoding: Encoding,
    pub parse_body: bool,
    pub accepted_methods: Vec<RouteMethod>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limit: Limit::default(),
            encoding: Encoding::default(),
            parse_body: true,
            accepted_methods: RouteMethod::ALL.to_vec(),
        }
    }
}

impl Config {
    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_parse_body(mut self, parse_body: bool) -> Self {
        self.parse_body = parse_body;
        self
    }

    pub fn with_accepted_methods<I: IntoIterator<Item = RouteMethod>>(mut self, methods: I) -> Self {
        self.accepted_methods = methods.into_iter().collect();
        self
    }

    pub fn accepts(&self, method: RouteMethod) -> bool {
        self.accepted_methods.contains(&method)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.limit.bytes(), 1024 * 1024);
        assert_eq!(config.encoding, Encoding::Utf8);
        assert!(config.parse_body);
        assert!(RouteMethod::ALL.into_iter().all(|method| config.accepts(method)));
    }

    #[test]
    fn test_deserialize() {
        let config: Config = serde_json::from_value(json!({
            "limit": "10kb",
            "encoding": "latin1",
            "parseBody": false,
            "acceptedMethods": ["GET", "use"]
        }))
        .unwrap();
        assert_eq!(
            config,
            Config::default()
                .with_limit(Limit::from_bytes(10 * 1024))
                .with_encoding(Encoding::Latin1)
                .with_parse_body(false)
                .with_accepted_methods([RouteMethod::Get, RouteMethod::Use])
        );

        let config: Config = serde_json::from_value(json!({ "limit": 512 })).unwrap();
        assert_eq!(config.limit.bytes(), 512);
        assert!(config.parse_body);
    }

    #[test]
    fn test_deserialize_rejects_invalid_values() {
        assert!(serde_json::from_value::<Config>(json!({ "limit": "lots" })).is_err());
        assert!(serde_json::from_value::<Config>(json!({ "encoding": "ebcdic" })).is_err());
        assert!(serde_json::from_value::<Config>(json!({ "acceptedMethods": ["trace"] })).is_err());
    }
}
