//! Tests for how the CLI wires the engine together.

use std::io::Write;

use cleanurls_core::config::CleanUrlsConfig;
use tempfile::NamedTempFile;

use crate::cli::build_engine;

const SITE: &str = r#"
[[courses]]
id = 4
shortname = "management"
parent = 1

[[courses]]
id = 5
shortname = "publish"
parent = 1

[[courses]]
id = 3
shortname = "short#course"
parent = 1
"#;

fn config() -> CleanUrlsConfig {
    CleanUrlsConfig {
        wwwroot: "http://www.example.com/moodle".to_string(),
        cleaningon: true,
        ..CleanUrlsConfig::default()
    }
}

#[test]
fn core_paths_clash_without_dirroot() {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(SITE.as_bytes()).unwrap();
    f.flush().unwrap();

    let engine = build_engine(&config(), Some(f.path())).unwrap();
    for id in [4, 5] {
        let url = format!("http://www.example.com/moodle/course/view.php?id={id}");
        assert_eq!(engine.clean(&url), url);
    }
    assert_eq!(
        engine.clean("http://www.example.com/moodle/course/view.php?id=3"),
        "http://www.example.com/moodle/course/short%23course"
    );
}

#[test]
fn legacy_scripts_restored_without_site_file() {
    let engine = build_engine(&config(), None).unwrap();
    let result = engine.unclean("course/management").unwrap();
    assert!(!result.fully_resolved);
    assert_eq!(
        result.url.to_string(),
        "http://www.example.com/moodle/course/management.php"
    );
}
