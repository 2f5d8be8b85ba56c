//! In-memory site data: entities and known paths.
//!
//! `MemorySite` implements both [`EntityProvider`] and [`PathOracle`], so a
//! whole site can be described in one TOML file and handed to the engine:
//!
//! ```toml
//! paths = ["course/management.php", "course/publish/index.php"]
//!
//! [[categories]]
//! id = 1
//! shortname = "sciences"
//!
//! [[courses]]
//! id = 2
//! shortname = "short#course"
//! parent = 1
//!
//! [[users]]
//! id = 3
//! shortname = "head1"
//!
//! [[modules]]
//! id = 4
//! shortname = "A!test@FORUM#5"
//! modname = "forum"
//! parent = 2
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::collision::{PathOracle, CORE_PATHS};
use crate::resolver::{Entity, EntityKind, EntityProvider};

/// On-disk form of a [`MemorySite`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteFile {
    #[serde(default)]
    pub courses: Vec<Entity>,
    #[serde(default)]
    pub categories: Vec<Entity>,
    #[serde(default)]
    pub users: Vec<Entity>,
    #[serde(default)]
    pub modules: Vec<Entity>,
    /// Site-relative files and directories that exist (e.g. `course/management.php`).
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySite {
    entities: BTreeMap<(EntityKind, i64), Entity>,
    paths: BTreeSet<String>,
}

impl MemorySite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a site description from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read site file {}", path.display()))?;
        let file: SiteFile = toml::from_str(&data)
            .with_context(|| format!("invalid site file {}", path.display()))?;
        let site = Self::from(file);
        tracing::debug!(
            entities = site.entities.len(),
            paths = site.paths.len(),
            "loaded site data from {}",
            path.display()
        );
        Ok(site)
    }

    pub fn insert(&mut self, kind: EntityKind, entity: Entity) {
        self.entities.insert((kind, entity.id), entity);
    }

    pub fn add_course(&mut self, id: i64, shortname: &str, category: i64) {
        self.insert(EntityKind::Course, visible(id, shortname, Some(category)));
    }

    pub fn add_category(&mut self, id: i64, name: &str, parent: Option<i64>) {
        self.insert(EntityKind::Category, visible(id, name, parent));
    }

    pub fn add_user(&mut self, id: i64, username: &str) {
        self.insert(EntityKind::User, visible(id, username, None));
    }

    /// Add a `modname` module (e.g. `forum`) named `name` to `course`.
    pub fn add_module(&mut self, id: i64, modname: &str, name: &str, course: i64) {
        let mut module = visible(id, name, Some(course));
        module.modname = Some(modname.to_string());
        self.insert(EntityKind::Module, module);
    }

    /// Record the scripts and directories every stock install has.
    pub fn add_core_paths(&mut self) {
        for path in CORE_PATHS {
            self.add_path(path);
        }
    }

    /// Whether any file or directory has been recorded.
    pub fn has_paths(&self) -> bool {
        !self.paths.is_empty()
    }

    /// Record an existing site-relative file or directory.
    pub fn add_path(&mut self, path: &str) {
        let trimmed = path.trim_matches('/');
        if !trimmed.is_empty() {
            self.paths.insert(trimmed.to_string());
        }
    }
}

fn visible(id: i64, shortname: &str, parent: Option<i64>) -> Entity {
    Entity {
        id,
        shortname: shortname.to_string(),
        parent,
        visible: true,
        modname: None,
    }
}

impl From<SiteFile> for MemorySite {
    fn from(file: SiteFile) -> Self {
        let mut site = MemorySite::new();
        for (kind, list) in [
            (EntityKind::Course, file.courses),
            (EntityKind::Category, file.categories),
            (EntityKind::User, file.users),
            (EntityKind::Module, file.modules),
        ] {
            for entity in list {
                site.insert(kind, entity);
            }
        }
        for path in &file.paths {
            site.add_path(path);
        }
        site
    }
}

impl EntityProvider for MemorySite {
    fn entity(&self, kind: EntityKind, id: i64) -> Option<Entity> {
        self.entities.get(&(kind, id)).cloned()
    }

    fn find(&self, kind: EntityKind, shortname: &str) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|((k, _), e)| *k == kind && e.shortname == shortname)
            .map(|(_, e)| e.clone())
            .collect()
    }
}

impl PathOracle for MemorySite {
    fn exists(&self, context: &str, segment: &str) -> bool {
        let context = context.trim_matches('/');
        let key = if context.is_empty() {
            segment.to_string()
        } else {
            format!("{context}/{segment}")
        };
        if self.paths.contains(&key) {
            return true;
        }
        // A recorded file implies its parent directories.
        let dir = format!("{key}/");
        self.paths
            .range(dir.clone()..)
            .next()
            .is_some_and(|p| p.starts_with(&dir))
    }
}
