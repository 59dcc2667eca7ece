mod rewriter;
mod rule;

pub use rewriter::PathRewriter;
pub use rule::RewriteRule;
