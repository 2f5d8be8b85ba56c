//! Cleaner: structured script URL -> clean path.

use crate::gate::RewriteMode;
use crate::rules::{Rule, RuleContext, RULES};
use crate::url_model::{CleanPath, StructuredUrl};

/// Clean `url` under the context's rewrite mode.
///
/// Never fails: whenever no rule applies, or the owning rule declines, the
/// result is the unchanged URL.
pub fn clean(url: &StructuredUrl, ctx: &RuleContext<'_>) -> CleanPath {
    let rule = match ctx.mode {
        RewriteMode::Off => None,
        RewriteMode::SelfTestOnly => Some(Rule::SelfTest).filter(|r| r.matches(url.path(), url.query())),
        RewriteMode::Active => RULES
            .iter()
            .copied()
            .find(|r| r.matches(url.path(), url.query())),
    };

    let Some(rule) = rule else {
        return CleanPath::unchanged(url);
    };

    match rule.clean(url, ctx) {
        Some(clean) => {
            tracing::debug!(rule = rule.name(), from = url.path(), to = %clean.path(), "cleaned url");
            clean
        }
        None => {
            tracing::trace!(rule = rule.name(), path = url.path(), "url left unchanged");
            CleanPath::unchanged(url)
        }
    }
}
