//! Path collision checks: keeps clean paths from shadowing real files and routes.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Top-level names the web server serves directly. Rules never rewrite URLs
/// under these, and no short name may take their place.
pub const PASSTHROUGH_PREFIXES: &[&str] = &[
    "admin",
    "auth",
    "lib",
    "theme",
    "pluginfile.php",
    "draftfile.php",
    "help.php",
];

/// Top-level segments used by clean paths themselves.
pub const ROUTE_ROOTS: &[&str] = &["course", "category", "user", "local"];

/// Well-known scripts and directories of a stock install, for when neither
/// `dirroot` nor a site file says what exists.
pub const CORE_PATHS: &[&str] = &[
    "index.php",
    "course/admin.php",
    "course/category.php",
    "course/completion.php",
    "course/delete.php",
    "course/edit.php",
    "course/editsection.php",
    "course/format",
    "course/index.php",
    "course/info.php",
    "course/lib.php",
    "course/management.php",
    "course/mod.php",
    "course/modedit.php",
    "course/publish",
    "course/recent.php",
    "course/report",
    "course/reset.php",
    "course/search.php",
    "course/switchrole.php",
    "course/user.php",
    "course/view.php",
    "user/edit.php",
    "user/editadvanced.php",
    "user/files.php",
    "user/index.php",
    "user/lib.php",
    "user/preferences.php",
    "user/profile.php",
    "user/view.php",
];

/// Answers whether `context/segment` exists on the site (file, directory or route).
pub trait PathOracle: Send + Sync {
    fn exists(&self, context: &str, segment: &str) -> bool;
}

/// Oracle that knows no paths; only the reserved set is checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPaths;

impl PathOracle for NoPaths {
    fn exists(&self, _context: &str, _segment: &str) -> bool {
        false
    }
}

/// Oracle backed by the site's code directory (`dirroot`).
#[derive(Debug, Clone)]
pub struct FsOracle {
    dirroot: PathBuf,
}

impl FsOracle {
    pub fn new(dirroot: impl Into<PathBuf>) -> Self {
        Self {
            dirroot: dirroot.into(),
        }
    }
}

impl PathOracle for FsOracle {
    fn exists(&self, context: &str, segment: &str) -> bool {
        // Anything that could step outside the context counts as taken.
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains('/') {
            return true;
        }
        let mut path = self.dirroot.clone();
        for part in context.split('/').filter(|p| !p.is_empty()) {
            path.push(part);
        }
        path.push(segment);
        path.exists()
    }
}

/// Reserved top-level names. Built once and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionSet {
    names: BTreeSet<String>,
}

impl CollisionSet {
    /// Passthrough prefixes plus route roots plus any site-specific extras.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = PASSTHROUGH_PREFIXES
            .iter()
            .chain(ROUTE_ROOTS)
            .map(|s| s.to_string())
            .chain(extra.into_iter().map(Into::into))
            .collect();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for CollisionSet {
    fn default() -> Self {
        Self::with_extra(std::iter::empty::<String>())
    }
}

/// Per-call view combining the reserved set with a path oracle.
#[derive(Clone, Copy)]
pub struct CollisionChecker<'a> {
    reserved: &'a CollisionSet,
    oracle: &'a dyn PathOracle,
}

impl<'a> CollisionChecker<'a> {
    pub fn new(reserved: &'a CollisionSet, oracle: &'a dyn PathOracle) -> Self {
        Self { reserved, oracle }
    }

    /// True when `candidate` would shadow a reserved name, `context/candidate`
    /// or `context/candidate.php`.
    pub fn collides(&self, candidate: &str, context: &str) -> bool {
        self.reserved.contains(candidate)
            || self.oracle.exists(context, candidate)
            || self.oracle.exists(context, &format!("{candidate}.php"))
    }

    /// True when the extension-less site path `path` names an existing `.php` script.
    pub fn has_script(&self, path: &str) -> bool {
        let (context, name) = match path.rsplit_once('/') {
            Some((context, name)) => (context, name),
            None => ("", path),
        };
        !name.is_empty() && self.oracle.exists(context, &format!("{name}.php"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::MemorySite;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reserved_names_always_collide() {
        let reserved = CollisionSet::default();
        let checker = CollisionChecker::new(&reserved, &NoPaths);
        for name in PASSTHROUGH_PREFIXES {
            assert!(checker.collides(name, "course"), "{name}");
        }
        assert!(checker.collides("user", "course"));
        assert!(!checker.collides("short#course", "course"));
    }

    #[test]
    fn extra_reserved_names() {
        let reserved = CollisionSet::with_extra(["blocks"]);
        assert!(reserved.contains("blocks"));
        assert!(reserved.contains("admin"));
    }

    #[test]
    fn memory_oracle_paths_collide_with_and_without_php() {
        let mut site = MemorySite::new();
        site.add_path("course/management.php");
        site.add_path("course/publish");
        let reserved = CollisionSet::default();
        let checker = CollisionChecker::new(&reserved, &site);
        assert!(checker.collides("management", "course"));
        assert!(checker.collides("publish", "course"));
        assert!(!checker.collides("management", "user"));
    }

    #[test]
    fn fs_oracle_checks_dirroot() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("course/publish")).unwrap();
        fs::write(dir.path().join("course/management.php"), "<?php").unwrap();
        let oracle = FsOracle::new(dir.path());
        let reserved = CollisionSet::default();
        let checker = CollisionChecker::new(&reserved, &oracle);
        assert!(checker.collides("publish", "course"));
        assert!(checker.collides("management", "course"));
        assert!(!checker.collides("short#course", "course"));
        assert!(checker.collides("..", "course"));
    }

    #[test]
    fn has_script_restores_extension() {
        let mut site = MemorySite::new();
        site.add_path("foo/bar.php");
        site.add_path("index.php");
        let reserved = CollisionSet::default();
        let checker = CollisionChecker::new(&reserved, &site);
        assert!(checker.has_script("foo/bar"));
        assert!(checker.has_script("index"));
        assert!(!checker.has_script("foo/baz"));
        assert!(!checker.has_script("foo/"));
    }
}
