//! Course, category and course module rules.

use crate::resolver::EntityKind;
use crate::url_model::{encode_segment, name_segment, CleanPath, StructuredUrl};

use super::RuleContext;

/// `course/view.php?id=N` -> `course/<shortname>`, other parameters kept.
pub(super) fn clean_course_view(url: &StructuredUrl, ctx: &RuleContext<'_>) -> Option<CleanPath> {
    let mut query = url.query().clone();
    let [id] = query.take_leading_ids(["id"])?;
    let segment = course_segment(id, ctx)?;
    Some(CleanPath::rewritten(
        url,
        vec!["course".to_string(), segment],
        query,
    ))
}

/// Encoded short name of a course that can stand in for `course/view.php?id=N`.
pub(super) fn course_segment(id: i64, ctx: &RuleContext<'_>) -> Option<String> {
    let name = ctx.resolver.resolve_short_name(EntityKind::Course, id)?;
    if ctx.collisions.collides(&name, "course") {
        tracing::debug!(id, name = %name, "course short name collides with an existing path");
        return None;
    }
    name_segment(&name)
}

/// `course/index.php` -> `course/`.
pub(super) fn clean_course_index(url: &StructuredUrl) -> Option<CleanPath> {
    Some(CleanPath::rewritten(
        url,
        vec!["course".to_string(), String::new()],
        url.query().clone(),
    ))
}

/// `course/index.php?categoryid=N` -> `category/<slug>-<id>/.../<slug>-N`.
pub(super) fn clean_category_index(
    url: &StructuredUrl,
    ctx: &RuleContext<'_>,
) -> Option<CleanPath> {
    let mut query = url.query().clone();
    let [id] = query.take_leading_ids(["categoryid"])?;
    let chain = ctx.resolver.category_chain(id)?;
    let mut segments = Vec::with_capacity(chain.len() + 1);
    segments.push("category".to_string());
    segments.extend(chain.iter().map(|s| encode_segment(s)));
    Some(CleanPath::rewritten(url, segments, query))
}

/// Module type in a `mod/<modname>/view.php` path.
///
/// Module types are plugin names, so only lower-case letters, digits and `_`.
pub(super) fn module_type(path: &str) -> Option<&str> {
    let modname = path.strip_prefix("mod/")?.strip_suffix("/view.php")?;
    let valid = !modname.is_empty()
        && modname
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    valid.then_some(modname)
}

/// `mod/<modname>/view.php?id=N` -> `course/<shortname>/<modname>/<slug>-N`.
pub(super) fn clean_module_view(url: &StructuredUrl, ctx: &RuleContext<'_>) -> Option<CleanPath> {
    let modname = module_type(url.path())?;
    if modname == "user" {
        return None;
    }
    let mut query = url.query().clone();
    let [id] = query.take_leading_ids(["id"])?;
    let (course_id, module) = ctx.resolver.module_segment(id, modname)?;
    let course = course_segment(course_id, ctx)?;
    Some(CleanPath::rewritten(
        url,
        vec![
            "course".to_string(),
            course,
            modname.to_string(),
            encode_segment(&module),
        ],
        query,
    ))
}
