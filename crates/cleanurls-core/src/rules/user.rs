//! User rules. The username ones depend on `cleanusernames`, enforced by the resolver.

use crate::resolver::EntityKind;
use crate::url_model::{name_segment, CleanPath, StructuredUrl};

use super::course::course_segment;
use super::RuleContext;

/// `user/profile.php?id=N` -> `user/<username>`.
pub(super) fn clean_user_profile(url: &StructuredUrl, ctx: &RuleContext<'_>) -> Option<CleanPath> {
    let mut query = url.query().clone();
    let [id] = query.take_leading_ids(["id"])?;
    let segment = username_segment(id, ctx)?;
    Some(CleanPath::rewritten(url, vec!["user".to_string(), segment], query))
}

/// `user/view.php?id=U&course=C` -> `course/<shortname>/user/<username>`.
pub(super) fn clean_course_user(url: &StructuredUrl, ctx: &RuleContext<'_>) -> Option<CleanPath> {
    let mut query = url.query().clone();
    let [user_id, course_id] = query.take_leading_ids(["id", "course"])?;
    let user = username_segment(user_id, ctx)?;
    let course = course_segment(course_id, ctx)?;
    Some(CleanPath::rewritten(
        url,
        vec!["course".to_string(), course, "user".to_string(), user],
        query,
    ))
}

/// `user/index.php?id=C` -> `course/<shortname>/user`.
pub(super) fn clean_course_participants(
    url: &StructuredUrl,
    ctx: &RuleContext<'_>,
) -> Option<CleanPath> {
    let mut query = url.query().clone();
    let [course_id] = query.take_leading_ids(["id"])?;
    let course = course_segment(course_id, ctx)?;
    Some(CleanPath::rewritten(
        url,
        vec!["course".to_string(), course, "user".to_string()],
        query,
    ))
}

/// Encoded username for a user path, unless it would shadow `user/<name>[.php]`.
fn username_segment(id: i64, ctx: &RuleContext<'_>) -> Option<String> {
    let name = ctx.resolver.resolve_short_name(EntityKind::User, id)?;
    if ctx.collisions.collides(&name, "user") {
        tracing::debug!(id, name = %name, "username collides with an existing path");
        return None;
    }
    name_segment(&name)
}
