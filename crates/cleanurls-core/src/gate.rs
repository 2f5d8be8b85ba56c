//! Rewrite gate: the process-wide switches that decide whether URLs are rewritten.
//!
//! Settings are staged with the `set_*` methods and only become visible to
//! clean/unclean calls after [`RewriteGate::apply`] (called from
//! [`Engine::purge_caches`](crate::engine::Engine::purge_caches)). Every call
//! reads one [`GateSettings`] snapshot at its start.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// What the engine is allowed to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteMode {
    /// The host does not delegate to the engine; nothing is rewritten.
    Off,
    /// Cleaning is off; only the fixed self-test path is rewritten.
    SelfTestOnly,
    /// All rules apply.
    Active,
}

/// The three plugin switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GateSettings {
    pub cleaningon: bool,
    pub enableurlrewrite: bool,
    pub cleanusernames: bool,
}

impl GateSettings {
    /// Effective mode. A disabled URL rewrite overrides `cleaningon`.
    pub fn mode(&self) -> RewriteMode {
        match (self.enableurlrewrite, self.cleaningon) {
            (false, _) => RewriteMode::Off,
            (true, false) => RewriteMode::SelfTestOnly,
            (true, true) => RewriteMode::Active,
        }
    }

    /// Cleaning requested while the host will never call the rewriter.
    pub fn is_inconsistent(&self) -> bool {
        self.cleaningon && !self.enableurlrewrite
    }
}

/// Staged and active gate settings, safe to share between threads.
#[derive(Debug, Default)]
pub struct RewriteGate {
    staged: RwLock<GateSettings>,
    active: RwLock<GateSettings>,
}

impl RewriteGate {
    pub fn new(initial: GateSettings) -> Self {
        if initial.is_inconsistent() {
            tracing::warn!("cleaningon is set but enableurlrewrite is off; URLs will not be rewritten");
        }
        Self {
            staged: RwLock::new(initial),
            active: RwLock::new(initial),
        }
    }

    /// Settings in effect for calls starting now.
    pub fn snapshot(&self) -> GateSettings {
        *self.active.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Settings that the next [`apply`](Self::apply) will activate.
    pub fn staged(&self) -> GateSettings {
        *self.staged.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_cleaning_on(&self, on: bool) {
        self.stage(|s| s.cleaningon = on);
    }

    pub fn set_enable_url_rewrite(&self, on: bool) {
        self.stage(|s| s.enableurlrewrite = on);
    }

    pub fn set_clean_usernames(&self, on: bool) {
        self.stage(|s| s.cleanusernames = on);
    }

    /// Replace all staged settings at once.
    pub fn stage_all(&self, settings: GateSettings) {
        self.stage(|s| *s = settings);
    }

    fn stage(&self, f: impl FnOnce(&mut GateSettings)) {
        let mut staged = self.staged.write().unwrap_or_else(|e| e.into_inner());
        f(&mut staged);
    }

    /// Activate the staged settings and return them.
    pub fn apply(&self) -> GateSettings {
        let staged = self.staged();
        if staged.is_inconsistent() {
            tracing::warn!("cleaningon is set but enableurlrewrite is off; URLs will not be rewritten");
        }
        *self.active.write().unwrap_or_else(|e| e.into_inner()) = staged;
        tracing::debug!(mode = ?staged.mode(), "rewrite gate applied");
        staged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(cleaningon: bool, enableurlrewrite: bool) -> GateSettings {
        GateSettings {
            cleaningon,
            enableurlrewrite,
            cleanusernames: false,
        }
    }

    #[test]
    fn mode_table() {
        assert_eq!(settings(false, false).mode(), RewriteMode::Off);
        assert_eq!(settings(true, false).mode(), RewriteMode::Off);
        assert_eq!(settings(false, true).mode(), RewriteMode::SelfTestOnly);
        assert_eq!(settings(true, true).mode(), RewriteMode::Active);
    }

    #[test]
    fn rewrite_off_with_cleaning_on_is_inconsistent() {
        assert!(settings(true, false).is_inconsistent());
        assert!(!settings(false, false).is_inconsistent());
        assert!(!settings(true, true).is_inconsistent());
    }

    #[test]
    fn staged_changes_wait_for_apply() {
        let gate = RewriteGate::new(settings(false, true));
        gate.set_cleaning_on(true);
        gate.set_clean_usernames(true);
        assert_eq!(gate.snapshot().mode(), RewriteMode::SelfTestOnly);
        assert!(gate.staged().cleaningon);

        let applied = gate.apply();
        assert_eq!(applied.mode(), RewriteMode::Active);
        assert!(gate.snapshot().cleanusernames);
    }

    #[test]
    fn stage_all_replaces_everything() {
        let gate = RewriteGate::new(settings(true, true));
        gate.stage_all(GateSettings::default());
        gate.apply();
        assert_eq!(gate.snapshot(), GateSettings::default());
        assert_eq!(gate.snapshot().mode(), RewriteMode::Off);
    }
}
