//! Entity resolver: short names for courses, categories, users and course modules.
//!
//! The engine never talks to a database. It depends on the [`EntityProvider`]
//! trait and turns its answers into names that are safe to put in a path.
//! Missing, hidden, blank or ambiguous entities yield `None`, which makes the
//! rules fall back to the unchanged URL.

mod cache;

pub use cache::ResolverCache;

use serde::{Deserialize, Serialize};

use crate::url_model::{id_from_slug_segment, slug_segment};

/// Upper bound on category nesting, also guards against parent cycles.
const MAX_CATEGORY_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Course,
    Category,
    User,
    /// A course module (forum, page, quiz...). `parent` is its course.
    Module,
}

/// What the host knows about one entity.
///
/// `shortname` is the course short name, the category name, the username or
/// the module instance name. `parent` is the category a course or category
/// lives in, or the course of a module. `modname` is the module type
/// (`forum`, `page`) and is only set for modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub shortname: String,
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modname: Option<String>,
}

fn default_visible() -> bool {
    true
}

/// Synchronous lookups into the host's data. Implemented outside the engine.
pub trait EntityProvider: Send + Sync {
    fn entity(&self, kind: EntityKind, id: i64) -> Option<Entity>;

    /// All entities of `kind` whose short name is exactly `shortname`.
    fn find(&self, kind: EntityKind, shortname: &str) -> Vec<Entity>;
}

/// Per-call view over a provider, its cache and the username switch.
#[derive(Clone, Copy)]
pub struct EntityResolver<'a> {
    provider: &'a dyn EntityProvider,
    cache: &'a ResolverCache,
    clean_usernames: bool,
}

impl<'a> EntityResolver<'a> {
    pub fn new(
        provider: &'a dyn EntityProvider,
        cache: &'a ResolverCache,
        clean_usernames: bool,
    ) -> Self {
        Self {
            provider,
            cache,
            clean_usernames,
        }
    }

    /// Display-safe short name for `(kind, id)`, or `None` when it cannot be used.
    pub fn resolve_short_name(&self, kind: EntityKind, id: i64) -> Option<String> {
        if kind == EntityKind::User && !self.clean_usernames {
            return None;
        }
        self.cache
            .get_or_insert_with(kind, id, || self.lookup_short_name(kind, id))
    }

    fn lookup_short_name(&self, kind: EntityKind, id: i64) -> Option<String> {
        let entity = self.provider.entity(kind, id)?;
        if !entity.visible {
            tracing::debug!(?kind, id, "entity is hidden; not cleaning");
            return None;
        }
        let name = entity.shortname.trim();
        if name.is_empty() || name != entity.shortname {
            return None;
        }
        // Category and module segments carry their id, so only courses and
        // users need unique names.
        if matches!(kind, EntityKind::Course | EntityKind::User) {
            let matches = self.provider.find(kind, name);
            if matches.len() != 1 || matches[0].id != id {
                tracing::debug!(?kind, id, name, "short name is not unique; not cleaning");
                return None;
            }
        }
        Some(entity.shortname)
    }

    /// Reverse lookup of a course or user short name.
    pub fn resolve_id(&self, kind: EntityKind, shortname: &str) -> Option<i64> {
        if kind == EntityKind::User && !self.clean_usernames {
            return None;
        }
        let matches = self.provider.find(kind, shortname);
        match matches.as_slice() {
            [only] if only.visible => Some(only.id),
            _ => None,
        }
    }

    /// Path segments for a category and all its ancestors, top level first.
    pub fn category_chain(&self, id: i64) -> Option<Vec<String>> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(category_id) = current {
            if chain.len() >= MAX_CATEGORY_DEPTH {
                tracing::warn!(id, "category chain too deep or cyclic; not cleaning");
                return None;
            }
            let name = self.resolve_short_name(EntityKind::Category, category_id)?;
            chain.push(slug_segment(&name, category_id));
            current = self
                .provider
                .entity(EntityKind::Category, category_id)
                .and_then(|c| c.parent);
        }
        chain.reverse();
        Some(chain)
    }

    /// Resolve a `<slug>-<id>` segment to a visible category directly under `parent`.
    ///
    /// The slug part is not checked; the id decides.
    pub fn category_from_segment(&self, segment: &str, parent: Option<i64>) -> Option<i64> {
        let id = id_from_slug_segment(segment)?;
        let category = self.provider.entity(EntityKind::Category, id)?;
        if !category.visible || category.parent != parent {
            return None;
        }
        Some(id)
    }

    /// A visible module with its course and type, ready to be cleaned.
    ///
    /// Returns the module's course id and its `<slug>-<id>` segment.
    pub fn module_segment(&self, id: i64, modname: &str) -> Option<(i64, String)> {
        let module = self.provider.entity(EntityKind::Module, id)?;
        if module.modname.as_deref() != Some(modname) {
            return None;
        }
        let course = module.parent?;
        let name = self.resolve_short_name(EntityKind::Module, id)?;
        Some((course, slug_segment(&name, id)))
    }

    /// Resolve a `<slug>-<id>` segment to a visible `modname` module in `course`.
    pub fn module_from_segment(&self, segment: &str, course: i64, modname: &str) -> Option<i64> {
        let id = id_from_slug_segment(segment)?;
        let module = self.provider.entity(EntityKind::Module, id)?;
        if !module.visible
            || module.parent != Some(course)
            || module.modname.as_deref() != Some(modname)
        {
            return None;
        }
        Some(id)
    }
}
