use std::{collections::HashMap, sync::Arc};

use regex::{Regex, RegexBuilder};

const PARAM: &str = r"([^\s/?]+)";
const WILDCARD: &str = ".*";
const TAIL: &str = r"/?(\?.*)?$";

/// A route pattern such as `/hello/:world/*` compiled into an anchored regex.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    param_names: Vec<String>,
}

impl CompiledPattern {
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let pattern = strip_trailing_slash(pattern);
        let mut expression = String::from("^");
        let mut literal = String::new();
        let mut param_names = Vec::new();
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                ':' if chars.peek().is_some_and(|c| is_word(*c)) => {
                    let mut name = String::new();
                    while let Some(c) = chars.next_if(|c| is_word(*c)) {
                        name.push(c);
                    }
                    flush_literal(&mut expression, &mut literal);
                    expression.push_str(PARAM);
                    param_names.push(name);
                }
                '*' => {
                    flush_literal(&mut expression, &mut literal);
                    expression.push_str(WILDCARD);
                }
                c => literal.push(c),
            }
        }
        flush_literal(&mut expression, &mut literal);
        expression.push_str(TAIL);
        let regex = RegexBuilder::new(&expression)
            .case_insensitive(true)
            .build()?;
        Ok(Self { regex, param_names })
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    /// Runs the pattern against `url`, pairing every parameter name with its
    /// captured segment.
    pub fn captures<'a, 'u>(&'a self, url: &'u str) -> Option<Vec<(&'a str, &'u str)>> {
        let captures = self.regex.captures(url)?;
        Some(
            self.param_names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    (
                        name.as_str(),
                        captures.get(i + 1).map_or("", |value| value.as_str()),
                    )
                })
                .collect(),
        )
    }
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn flush_literal(expression: &mut String, literal: &mut String) {
    if !literal.is_empty() {
        expression.push_str(&regex::escape(literal));
        literal.clear();
    }
}

/// Drops the last `/` of the path part, keeping a trailing query string.
fn strip_trailing_slash(pattern: &str) -> String {
    let (path, query) = pattern.split_at(pattern.find('?').unwrap_or(pattern.len()));
    match path.strip_suffix('/') {
        Some(path) => format!("{path}{query}"),
        None => pattern.to_string(),
    }
}

/// Compiled patterns keyed by their literal pattern string.
#[derive(Debug, Default, Clone)]
pub struct PatternCache {
    patterns: HashMap<String, Arc<CompiledPattern>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pattern: &str) -> Option<&Arc<CompiledPattern>> {
        self.patterns.get(pattern)
    }

    pub fn get_or_compile(&mut self, pattern: &str) -> Result<Arc<CompiledPattern>, regex::Error> {
        if let Some(compiled) = self.patterns.get(pattern) {
            return Ok(Arc::clone(compiled));
        }
        let compiled = Arc::new(CompiledPattern::compile(pattern)?);
        self.patterns
            .insert(pattern.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
