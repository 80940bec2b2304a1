use std::collections::HashMap;

/// Parses `a=1&b=two+words` style pairs, percent-decoding keys and values
/// and reading `+` as a space. The first occurrence of a key wins.
pub fn parse(input: &str) -> HashMap<String, String> {
    let mut pairs = HashMap::new();
    for pair in input.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = unescape(key);
        if key.is_empty() {
            continue;
        }
        pairs.entry(key).or_insert_with(|| unescape(value));
    }
    pairs
}

fn unescape(input: &str) -> String {
    let input = input.replace('+', " ");
    match urlencoding::decode(&input) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(input.as_bytes())).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse("hello=world"), map(&[("hello", "world")]));
        assert_eq!(
            parse("name=John+Doe&city=New%20York&empty=&flag"),
            map(&[
                ("name", "John Doe"),
                ("city", "New York"),
                ("empty", ""),
                ("flag", "")
            ])
        );
        assert_eq!(parse(""), HashMap::new());
        assert_eq!(parse("&&=orphan"), HashMap::new());
    }

    #[test]
    fn test_first_key_wins() {
        assert_eq!(parse("a=1&a=2"), map(&[("a", "1")]));
    }

    #[test]
    fn test_invalid_escapes_are_kept() {
        assert_eq!(parse("q=100%&bad=%ff"), map(&[("q", "100%"), ("bad", "\u{fffd}")]));
    }
}
