use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::Error;

const DEFAULT_LIMIT: usize = 1024 * 1024;

/// Maximum request body size.
///
/// Parsed from a byte count or a string with an optional `b`, `kb`, `mb`,
/// `gb`, `tb` or `pb` suffix (powers of 1024): `"1mb"`, `"1.5kb"`, `"300"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "LimitValue")]
pub struct Limit(usize);

#[derive(Deserialize)]
#[serde(untagged)]
enum LimitValue {
    Bytes(usize),
    Text(String),
}

impl TryFrom<LimitValue> for Limit {
    type Error = Error;

    fn try_from(value: LimitValue) -> Result<Self, Self::Error> {
        match value {
            LimitValue::Bytes(bytes) => Ok(Self(bytes)),
            LimitValue::Text(text) => text.parse(),
        }
    }
}

impl Limit {
    pub fn from_bytes(bytes: usize) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> usize {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}b", self.0)
    }
}

impl FromStr for Limit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::Config(format!("invalid limit {s:?}"));
        let s = s.trim();
        let (amount, unit) =
            s.split_at(s.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(s.len()));
        let amount: f64 = amount.parse().map_err(|_| invalid())?;
        let exponent = match unit.trim().to_ascii_lowercase().as_str() {
            "" | "b" => 0,
            "kb" => 1,
            "mb" => 2,
            "gb" => 3,
            "tb" => 4,
            "pb" => 5,
            _ => return Err(invalid()),
        };
        let bytes = (amount * 1024f64.powi(exponent)).floor();
        if !bytes.is_finite() || bytes >= usize::MAX as f64 {
            return Err(invalid());
        }
        Ok(Self(bytes as usize))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(s: &str) -> usize {
        s.parse::<Limit>().unwrap().bytes()
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse("1mb"), 1_048_576);
        assert_eq!(parse("10kb"), 10_240);
        assert_eq!(parse("1.5KB"), 1_536);
        assert_eq!(parse("300"), 300);
        assert_eq!(parse("300b"), 300);
        assert_eq!(parse(" 2 gb "), 2 * 1024 * 1024 * 1024);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<Limit>().is_err());
        assert!("mb".parse::<Limit>().is_err());
        assert!("-1mb".parse::<Limit>().is_err());
        assert!("1 megabyte".parse::<Limit>().is_err());
        assert!("99999999999pb".parse::<Limit>().is_err());
        assert!("1.2.3kb".parse::<Limit>().is_err());
        assert!("9".repeat(400).parse::<Limit>().is_err());
    }
}
