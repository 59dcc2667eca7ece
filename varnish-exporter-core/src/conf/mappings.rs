use crate::conf::ConfigError;
use crate::rewrite::{PathRewriter, RewriteRule};
use std::fs;
use std::path::Path;

/// Load the rewrite rules file, or an empty rewriter when no file is configured.
pub fn load_rewriter(path: Option<&Path>) -> Result<PathRewriter, ConfigError> {
    let Some(path) = path else {
        return Ok(PathRewriter::default());
    };

    let text = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let rewriter = parse_mappings(path, &text)?;

    tracing::info!(
        path = %path.display(),
        rules = rewriter.len(),
        "path mappings loaded"
    );

    Ok(rewriter)
}

/// Parse rules, one per line: a pattern, then optionally whitespace and a replacement.
///
/// `#` starts a comment anywhere on the line. A pattern with no replacement strips
/// whatever it matches. `origin` only labels errors.
pub fn parse_mappings(origin: &Path, text: &str) -> Result<PathRewriter, ConfigError> {
    let mut rules = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        let invalid = |source| ConfigError::InvalidRule {
            path: origin.to_path_buf(),
            line: idx + 1,
            rule: line.to_string(),
            source,
        };

        let rule = match line.split_once(char::is_whitespace) {
            Some((pattern, replacement)) => {
                let replacement = replacement.trim_start();
                tracing::debug!(pattern, replacement, "mapping replace");
                RewriteRule::new(pattern, replacement).map_err(invalid)?
            }
            None => {
                tracing::debug!(pattern = line, "mapping strip");
                RewriteRule::strip(line).map_err(invalid)?
            }
        };

        rules.push(rule);
    }

    Ok(PathRewriter::new(rules))
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(at) => &line[..at],
        None => line,
    }
}
