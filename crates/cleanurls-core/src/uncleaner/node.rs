//! Uncleaner node graph.
//!
//! Each node knows which segments may follow it and, if parsing ends there,
//! which script and parameters it stands for.
//!
//! ```text
//! Root ─ course ─ Courses ─ <shortname> ─ Course ─ user ─ CourseUsers ─ <username> ─ CourseUser
//!      │                                          └ <modname>/<slug>-<id> ─ Module
//!      ├ category ─ Category(None) ─ <slug>-<id> ─ Category(Some) ─ ...
//!      ├ user ─ Users ─ <username> ─ User
//!      └ local/cleanurls/tests/bar ─ SelfTest
//! ```
//!
//! Course and user names are only accepted when the cleaner could have
//! produced them, i.e. when they do not collide with an existing path.

use crate::resolver::EntityKind;
use crate::rules::{RuleContext, SELF_TEST_CLEAN, SELF_TEST_SCRIPT};

use super::state::ParseState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Root,
    SelfTest,
    Courses,
    Course { id: i64 },
    CourseUsers { course: i64 },
    CourseUser { course: i64, user: i64 },
    Module { id: i64, modname: String },
    Category { id: Option<i64> },
    Users,
    User { id: i64 },
}

/// Script and leading parameters a node resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Target {
    pub script: String,
    pub params: Vec<(&'static str, String)>,
}

impl Target {
    fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            params: Vec::new(),
        }
    }

    fn param(mut self, key: &'static str, id: i64) -> Self {
        self.params.push((key, id.to_string()));
        self
    }
}

impl Node {
    /// Consume the segments this node accepts next and return the node they
    /// lead to, or `None` (consuming nothing) when the next segment is not
    /// understood here.
    pub fn step(&self, state: &mut ParseState, ctx: &RuleContext<'_>) -> Option<Node> {
        let next = match self {
            Node::Root => return root_step(state),
            Node::Courses => Node::Course {
                id: named(state, ctx, EntityKind::Course, "course")?,
            },
            Node::Course { id } => match state.peek()? {
                "user" => Node::CourseUsers { course: *id },
                _ => return module_step(state, ctx, *id),
            },
            Node::CourseUsers { course } => Node::CourseUser {
                course: *course,
                user: named(state, ctx, EntityKind::User, "user")?,
            },
            Node::Category { id } => {
                let child = ctx.resolver.category_from_segment(state.peek()?, *id)?;
                Node::Category { id: Some(child) }
            }
            Node::Users => Node::User {
                id: named(state, ctx, EntityKind::User, "user")?,
            },
            Node::SelfTest | Node::CourseUser { .. } | Node::User { .. } | Node::Module { .. } => {
                return None
            }
        };
        state.consume(1);
        Some(next)
    }

    /// What the path means when it ends at this node.
    pub fn target(&self) -> Option<Target> {
        let target = match self {
            Node::Root => Target::new(""),
            Node::SelfTest => Target::new(SELF_TEST_SCRIPT),
            Node::Courses | Node::Category { id: None } => Target::new("course/index.php"),
            Node::Course { id } => Target::new("course/view.php").param("id", *id),
            Node::CourseUsers { course } => Target::new("user/index.php").param("id", *course),
            Node::CourseUser { course, user } => Target::new("user/view.php")
                .param("id", *user)
                .param("course", *course),
            Node::Module { id, modname } => {
                Target::new(format!("mod/{modname}/view.php")).param("id", *id)
            }
            Node::Category { id: Some(id) } => {
                Target::new("course/index.php").param("categoryid", *id)
            }
            Node::Users => return None,
            Node::User { id } => Target::new("user/profile.php").param("id", *id),
        };
        Some(target)
    }
}

fn root_step(state: &mut ParseState) -> Option<Node> {
    let self_test_len = SELF_TEST_CLEAN.split('/').count();
    if let Some(segments) = state.peek_n(self_test_len) {
        if SELF_TEST_CLEAN.split('/').eq(segments) {
            state.consume(self_test_len);
            return Some(Node::SelfTest);
        }
    }
    let next = match state.peek()? {
        "course" => Node::Courses,
        "category" => Node::Category { id: None },
        "user" => Node::Users,
        _ => return None,
    };
    state.consume(1);
    Some(next)
}

/// Id of the course or user whose short name is the next segment, unless that
/// name collides with `context/<name>` or `context/<name>.php`.
fn named(
    state: &ParseState,
    ctx: &RuleContext<'_>,
    kind: EntityKind,
    context: &str,
) -> Option<i64> {
    let name = state.peek()?;
    if ctx.collisions.collides(name, context) {
        tracing::debug!(name, context, "segment collides with an existing path; not uncleaning");
        return None;
    }
    ctx.resolver.resolve_id(kind, name)
}

/// `<modname>/<slug>-<id>` under a course.
fn module_step(state: &mut ParseState, ctx: &RuleContext<'_>, course: i64) -> Option<Node> {
    let (modname, id) = match state.peek_n(2)?.as_slice() {
        [modname, segment] => (
            modname.to_string(),
            ctx.resolver.module_from_segment(segment, course, modname)?,
        ),
        _ => return None,
    };
    state.consume(2);
    Some(Node::Module { id, modname })
}
