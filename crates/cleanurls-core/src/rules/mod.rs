//! Cleaning rules, evaluated in a fixed priority order.
//!
//! Each [`Rule`] has a predicate over the script path (and query keys) and a
//! clean transform. The first rule whose predicate matches owns the URL; if
//! its transform declines (returns `None`) the URL is left unchanged. The
//! inverse transforms live in the uncleaner's node graph.

mod course;
mod user;

use crate::collision::{CollisionChecker, PASSTHROUGH_PREFIXES};
use crate::gate::RewriteMode;
use crate::resolver::EntityResolver;
use crate::url_model::{CleanPath, QueryParams, StructuredUrl};

/// Script rewritten even when cleaning is off, so the rewrite path can be self-tested.
pub const SELF_TEST_SCRIPT: &str = "local/cleanurls/tests/foo.php";
/// Clean form of [`SELF_TEST_SCRIPT`].
pub const SELF_TEST_CLEAN: &str = "local/cleanurls/tests/bar";

/// Everything a rule may consult, built once per clean/unclean call.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub mode: RewriteMode,
    pub resolver: EntityResolver<'a>,
    pub collisions: CollisionChecker<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `admin/*`, `auth/*`, `lib/*`, `theme/*`, `pluginfile.php`, `draftfile.php`, `help.php`.
    ReservedPassthrough,
    /// `local/cleanurls/tests/foo.php` -> `local/cleanurls/tests/bar`.
    SelfTest,
    /// `course/view.php?id=N` -> `course/<shortname>`.
    CourseView,
    /// `course/index.php` -> `course/`.
    CourseIndex,
    /// `course/index.php?categoryid=N` -> `category/<slug>-<id>/...`.
    CategoryIndex,
    /// `user/profile.php?id=N` -> `user/<username>`.
    UserProfile,
    /// `user/view.php?id=U&course=C` -> `course/<shortname>/user/<username>`.
    CourseUser,
    /// `user/index.php?id=C` -> `course/<shortname>/user`.
    CourseParticipants,
    /// `mod/<modname>/view.php?id=N` -> `course/<shortname>/<modname>/<slug>-N`.
    ModuleView,
    /// Anything else: unchanged, `.php` kept.
    Fallback,
}

/// Priority order used by the cleaner.
pub const RULES: [Rule; 10] = [
    Rule::ReservedPassthrough,
    Rule::SelfTest,
    Rule::CourseView,
    Rule::CourseIndex,
    Rule::CategoryIndex,
    Rule::UserProfile,
    Rule::CourseUser,
    Rule::CourseParticipants,
    Rule::ModuleView,
    Rule::Fallback,
];

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::ReservedPassthrough => "reserved-passthrough",
            Rule::SelfTest => "self-test",
            Rule::CourseView => "course-view",
            Rule::CourseIndex => "course-index",
            Rule::CategoryIndex => "category-index",
            Rule::UserProfile => "user-profile",
            Rule::CourseUser => "course-user",
            Rule::CourseParticipants => "course-participants",
            Rule::ModuleView => "module-view",
            Rule::Fallback => "fallback",
        }
    }

    /// Whether this rule owns `path` with the given query.
    pub fn matches(&self, path: &str, query: &QueryParams) -> bool {
        match self {
            Rule::ReservedPassthrough => is_reserved_path(path),
            Rule::SelfTest => path == SELF_TEST_SCRIPT,
            Rule::CourseView => path == "course/view.php" && query.contains_key("id"),
            Rule::CourseIndex => {
                path == "course/index.php" && !query.contains_key("categoryid")
            }
            Rule::CategoryIndex => {
                path == "course/index.php" && query.contains_key("categoryid")
            }
            Rule::UserProfile => path == "user/profile.php" && query.contains_key("id"),
            Rule::CourseUser => {
                path == "user/view.php" && query.contains_key("id") && query.contains_key("course")
            }
            Rule::CourseParticipants => path == "user/index.php" && query.contains_key("id"),
            Rule::ModuleView => course::module_type(path).is_some() && query.contains_key("id"),
            Rule::Fallback => true,
        }
    }

    /// Clean transform. `None` leaves the URL unchanged.
    pub fn clean(&self, url: &StructuredUrl, ctx: &RuleContext<'_>) -> Option<CleanPath> {
        match self {
            Rule::ReservedPassthrough | Rule::Fallback => None,
            Rule::SelfTest => Some(CleanPath::rewritten(
                url,
                SELF_TEST_CLEAN.split('/').map(str::to_string).collect(),
                url.query().clone(),
            )),
            Rule::CourseView => course::clean_course_view(url, ctx),
            Rule::CourseIndex => course::clean_course_index(url),
            Rule::CategoryIndex => course::clean_category_index(url, ctx),
            Rule::UserProfile => user::clean_user_profile(url, ctx),
            Rule::CourseUser => user::clean_course_user(url, ctx),
            Rule::CourseParticipants => user::clean_course_participants(url, ctx),
            Rule::ModuleView => course::clean_module_view(url, ctx),
        }
    }
}

/// True for paths under a passthrough prefix (`admin/...`, `pluginfile.php/...`).
pub fn is_reserved_path(path: &str) -> bool {
    let first = path.split('/').next().unwrap_or_default();
    PASSTHROUGH_PREFIXES.contains(&first)
}
