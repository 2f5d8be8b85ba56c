//! Uncleaner: clean path -> structured script URL.
//!
//! Parsing walks the node graph in [`node`] with an explicit loop: each step
//! consumes segments from the front of the [`ParseState`] queue and moves to
//! the next node. When a node declines, parsing stops and the result says how
//! far it got.

mod node;
mod state;

use crate::gate::RewriteMode;
use crate::rules::{RuleContext, SELF_TEST_CLEAN};
use crate::url_model::{QueryParams, StructuredUrl};

use state::ParseState;

/// Outcome of uncleaning one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncleanResult {
    /// Reconstructed script URL, or the input (best effort) when not resolved.
    pub url: StructuredUrl,
    /// True when every segment was consumed and mapped to a script.
    pub fully_resolved: bool,
    /// Developer-facing message for partial parses.
    pub diagnostic: Option<String>,
}

impl UncleanResult {
    /// The input as-is; the gate did not allow uncleaning.
    fn untouched(url: &StructuredUrl) -> Self {
        Self {
            url: url.clone(),
            fully_resolved: false,
            diagnostic: None,
        }
    }
}

/// Unclean `url` under the context's rewrite mode.
pub fn unclean(url: &StructuredUrl, ctx: &RuleContext<'_>) -> UncleanResult {
    match ctx.mode {
        RewriteMode::Off => return UncleanResult::untouched(url),
        RewriteMode::SelfTestOnly if url.path() != SELF_TEST_CLEAN => {
            return UncleanResult::untouched(url)
        }
        _ => {}
    }

    let mut state = ParseState::new(url.path());
    while !state.is_done() {
        if state.at_trailing_slash() {
            state.consume(1);
            break;
        }
        let node = state.node.clone();
        match node.step(&mut state, ctx) {
            Some(next) => state.node = next,
            None => break,
        }
    }

    if state.is_done() {
        if let Some(target) = state.node.target() {
            let mut query: QueryParams = target.params.into_iter().collect();
            query.append(url.query());
            let resolved = StructuredUrl::new(
                url.root().clone(),
                target.script,
                query,
                url.fragment().map(str::to_string),
            );
            tracing::debug!(from = url.path(), to = resolved.path(), "uncleaned url");
            return UncleanResult {
                url: resolved,
                fully_resolved: true,
                diagnostic: None,
            };
        }
    }

    partial(url, &state, ctx)
}

fn partial(url: &StructuredUrl, state: &ParseState, ctx: &RuleContext<'_>) -> UncleanResult {
    let remaining = if state.is_done() {
        url.path().to_string()
    } else {
        state.remaining_path()
    };
    let diagnostic = format!("Could not unclean until the end of address: {remaining}");
    tracing::warn!(consumed = state.consumed(), node = ?state.node, "{}", diagnostic);

    let path = restore_extension(url.path(), ctx);
    UncleanResult {
        url: StructuredUrl::new(
            url.root().clone(),
            path,
            url.query().clone(),
            url.fragment().map(str::to_string),
        ),
        fully_resolved: false,
        diagnostic: Some(diagnostic),
    }
}

/// Re-append `.php` to an extension-less path when that script exists.
fn restore_extension(path: &str, ctx: &RuleContext<'_>) -> String {
    let last = path.rsplit('/').next().unwrap_or_default();
    if last.is_empty() || last.contains('.') || !ctx.collisions.has_script(path) {
        return path.to_string();
    }
    format!("{path}.php")
}
