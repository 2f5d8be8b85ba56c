//! The engine: site root, rewrite gate, collaborators and caches in one place.
//!
//! `Engine` is `Send + Sync`; clean and unclean calls can run concurrently.
//! Each call takes one gate snapshot at its start and builds a fresh
//! [`RuleContext`] from it.

use std::sync::Arc;

use crate::cleaner;
use crate::collision::{CollisionChecker, CollisionSet, PathOracle};
use crate::error::UrlError;
use crate::gate::{GateSettings, RewriteGate};
use crate::resolver::{EntityProvider, EntityResolver, ResolverCache};
use crate::rules::RuleContext;
use crate::uncleaner::{self, UncleanResult};
use crate::url_model::{CleanPath, SiteRoot, StructuredUrl};

pub struct Engine {
    root: SiteRoot,
    gate: RewriteGate,
    reserved: CollisionSet,
    provider: Arc<dyn EntityProvider>,
    oracle: Arc<dyn PathOracle>,
    cache: ResolverCache,
}

impl Engine {
    pub fn new(
        root: SiteRoot,
        settings: GateSettings,
        provider: Arc<dyn EntityProvider>,
        oracle: Arc<dyn PathOracle>,
    ) -> Self {
        Self {
            root,
            gate: RewriteGate::new(settings),
            reserved: CollisionSet::default(),
            provider,
            oracle,
            cache: ResolverCache::new(),
        }
    }

    /// Replace the reserved top-level names.
    pub fn with_reserved(mut self, reserved: CollisionSet) -> Self {
        self.reserved = reserved;
        self
    }

    pub fn root(&self) -> &SiteRoot {
        &self.root
    }

    pub fn gate(&self) -> &RewriteGate {
        &self.gate
    }

    pub fn reserved(&self) -> &CollisionSet {
        &self.reserved
    }

    /// Activate staged gate settings and drop cached short names.
    pub fn purge_caches(&self) {
        let settings = self.gate.apply();
        let dropped = self.cache.len();
        self.cache.clear();
        tracing::info!(mode = ?settings.mode(), dropped, "caches purged");
    }

    pub fn parse(&self, input: &str) -> Result<StructuredUrl, UrlError> {
        StructuredUrl::parse(input, &self.root)
    }

    pub fn clean_url(&self, url: &StructuredUrl) -> CleanPath {
        let settings = self.gate.snapshot();
        cleaner::clean(url, &self.context(settings))
    }

    /// Clean an absolute or site-relative URL string.
    ///
    /// Input that cannot be parsed, or lies outside the site, is returned as-is.
    pub fn clean(&self, input: &str) -> String {
        match self.parse(input) {
            Ok(url) => self.clean_url(&url).to_string(),
            Err(err) => {
                tracing::debug!("not cleaning {input:?}: {err}");
                input.to_string()
            }
        }
    }

    pub fn unclean_url(&self, url: &StructuredUrl) -> UncleanResult {
        let settings = self.gate.snapshot();
        uncleaner::unclean(url, &self.context(settings))
    }

    /// Unclean an absolute or site-relative URL string.
    pub fn unclean(&self, input: &str) -> Result<UncleanResult, UrlError> {
        let url = self.parse(input)?;
        Ok(self.unclean_url(&url))
    }

    fn context(&self, settings: GateSettings) -> RuleContext<'_> {
        RuleContext {
            mode: settings.mode(),
            resolver: EntityResolver::new(
                self.provider.as_ref(),
                &self.cache,
                settings.cleanusernames,
            ),
            collisions: CollisionChecker::new(&self.reserved, self.oracle.as_ref()),
        }
    }
}
