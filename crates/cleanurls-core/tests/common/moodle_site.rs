//! A small site resembling a fresh install: two categories, a few courses,
//! a forum, one staff user and the core files that clash with course short names.

use std::sync::Arc;

use cleanurls_core::site::MemorySite;
use cleanurls_core::url_model::SiteRoot;
use cleanurls_core::{Engine, GateSettings};

pub const WWWROOT: &str = "http://www.example.com/moodle";

pub const SCIENCES: i64 = 1;
pub const COMPSCI: i64 = 2;
pub const SHORT_COURSE: i64 = 3;
pub const MANAGEMENT_COURSE: i64 = 4;
pub const PUBLISH_COURSE: i64 = 5;
pub const STAFF: i64 = 6;
pub const FORUM: i64 = 7;

pub fn site() -> MemorySite {
    let mut site = MemorySite::new();
    site.add_category(SCIENCES, "sciences", None);
    site.add_category(COMPSCI, "compsci", Some(SCIENCES));
    site.add_course(SHORT_COURSE, "short#course", SCIENCES);
    site.add_course(MANAGEMENT_COURSE, "management", SCIENCES);
    site.add_course(PUBLISH_COURSE, "publish", SCIENCES);
    site.add_module(FORUM, "forum", "A!test@FORUM#5", SHORT_COURSE);
    site.add_user(STAFF, "head1");
    for path in [
        "index.php",
        "course/index.php",
        "course/view.php",
        "course/management.php",
        "course/publish/index.php",
        "user/profile.php",
        "user/view.php",
        "user/index.php",
        "mod/forum/view.php",
        "local/cleanurls/tests/foo.php",
    ] {
        site.add_path(path);
    }
    site
}

pub fn engine(settings: GateSettings) -> Engine {
    let site = Arc::new(site());
    Engine::new(SiteRoot::parse(WWWROOT).unwrap(), settings, site.clone(), site)
}

pub fn settings(cleaningon: bool, enableurlrewrite: bool, cleanusernames: bool) -> GateSettings {
    GateSettings {
        cleaningon,
        enableurlrewrite,
        cleanusernames,
    }
}

pub fn url(path: &str) -> String {
    format!("{WWWROOT}/{path}")
}
