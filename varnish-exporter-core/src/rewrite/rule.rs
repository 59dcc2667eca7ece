use regex::Regex;
use std::borrow::Cow;

/// A single path mapping: every match of `pattern` is replaced by `replacement`.
///
/// An empty replacement deletes the matched text. A replacement may refer to the
/// pattern's own capture groups (`$1`, `${name}`).
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// A rule that deletes every match of `pattern`.
    pub fn strip(pattern: &str) -> Result<Self, regex::Error> {
        Self::new(pattern, "")
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn is_strip(&self) -> bool {
        self.replacement.is_empty()
    }

    /// Replace all non-overlapping matches in `path`.
    ///
    /// Returns `Cow::Borrowed` when nothing matched. Empty matches advance by one
    /// position, so a pattern like `x*` terminates in linear time.
    pub fn apply<'a>(&self, path: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(path, self.replacement.as_str())
    }
}
