use std::str::FromStr;

use serde::Deserialize;

use super::DecodeError;
use crate::Error;

/// Charset used to turn `text/*` payloads into strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
}

impl Encoding {
    /// Resolves a charset label such as `utf-8` or `ISO-8859-1`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Some(Self::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" | "binary" | "ascii" | "us-ascii" => {
                Some(Self::Latin1)
            }
            _ => None,
        }
    }

    pub fn decode(&self, bytes: Vec<u8>) -> Result<String, DecodeError> {
        match self {
            Self::Utf8 => String::from_utf8(bytes).map_err(DecodeError::Text),
            Self::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| Error::Config(format!("unsupported encoding {s:?}")))
    }
}

impl TryFrom<String> for Encoding {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Encoding::from_label("UTF-8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::from_label("ISO-8859-1"), Some(Encoding::Latin1));
        assert_eq!(Encoding::from_label("shift_jis"), None);
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            Encoding::Utf8.decode("héllo".as_bytes().to_vec()).unwrap(),
            "héllo"
        );
        assert!(Encoding::Utf8.decode(vec![0xff, 0xfe]).is_err());
        assert_eq!(Encoding::Latin1.decode(vec![0x68, 0xe9]).unwrap(), "hé");
    }
}
