use crate::rewrite::RewriteRule;
use std::borrow::Cow;

/// Ordered sequence of path mappings, fixed at startup.
///
/// Rules are not alternatives: every rule runs, in order, against the output of
/// the previous one.
#[derive(Debug, Clone, Default)]
pub struct PathRewriter {
    rules: Vec<RewriteRule>,
}

impl PathRewriter {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite a raw request path into its label value.
    ///
    /// With no rules configured this is the identity function.
    pub fn normalize(&self, path: &str) -> String {
        let mut current = path.to_owned();

        for rule in &self.rules {
            let rewritten = match rule.apply(&current) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(rewritten) => rewritten,
            };
            current = rewritten;
        }

        current
    }
}
