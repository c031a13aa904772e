use predicates::prelude::*;
use raydor::test_utils::{ManifestFixture, SiteFixture};
use std::fs;

use crate::common::{blog_site, raydor};

/// A single rendered page with inline variables
#[test]
fn test_hello_index() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("templates/index.html", "<h1>{{ title }}</h1>")
        .unwrap()
        .with_manifest(&ManifestFixture::hello().content)
        .unwrap();

    raydor(&site)
        .assert()
        .success()
        .stdout(predicate::str::contains("index.html.. done"))
        .stdout(predicate::str::contains("Built 1 entries: 1 rendered, 0 generated, 0 copied"));

    assert_eq!(site.read_output("index.html").unwrap(), "<h1>Hello</h1>");
}

/// The same site described by a JSON manifest
#[test]
fn test_json_manifest() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("templates/index.html", "{{ title }} {{ n }}")
        .unwrap()
        .with_manifest_named(
            "site.json",
            r#"{"index.html": {"template": "templates/index.html", "vars": {"title": "Hi", "n": 3}}}"#,
        )
        .unwrap();

    raydor(&site).assert().success();
    assert_eq!(site.read_output("index.html").unwrap(), "Hi 3");
}

/// Copy entries reproduce files and directory trees byte for byte
#[test]
fn test_copy_entries() {
    let site = blog_site()
        .with_file("favicon.ico", "\u{0}\u{1}icon")
        .unwrap()
        .with_manifest("static/: static/\nfavicon.ico: favicon.ico\nassets/logo.svg: static/img/logo.svg\n")
        .unwrap();

    raydor(&site).assert().success();

    assert_eq!(site.read_output("static/style.css").unwrap(), "body { margin: 0 }");
    assert_eq!(site.read_output("static/img/logo.svg").unwrap(), "<svg/>");
    assert_eq!(site.read_output("assets/logo.svg").unwrap(), "<svg/>");
    assert_eq!(
        fs::read(site.output_dir().join("favicon.ico")).unwrap(),
        fs::read(site.root().join("favicon.ico")).unwrap()
    );
}

/// A file copied to a key ending in `/` lands inside that directory
#[test]
fn test_copy_file_into_directory_key() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("favicon.ico", "icon")
        .unwrap()
        .with_manifest("icons/: favicon.ico\n")
        .unwrap();

    raydor(&site).assert().success();
    assert_eq!(site.read_output("icons/favicon.ico").unwrap(), "icon");
}

/// Entries are processed and reported in manifest order
#[test]
fn test_progress_follows_manifest_order() {
    let site = blog_site()
        .with_manifest(
            "globals:\n  site: raydor\nzzz.css: static/style.css\nindex.html:\n  template: templates/index.html\n  vars:\n    posts: src/blog/*.md\naaa.svg: static/img/logo.svg\n",
        )
        .unwrap();

    raydor(&site).assert().success().stdout(predicate::str::starts_with(
        "zzz.css.. done\nindex.html.. done\naaa.svg.. done\n",
    ));
}

/// Stale files disappear and a second build produces identical output
#[test]
fn test_rebuild_is_clean_and_identical() {
    let site = blog_site()
        .with_manifest(
            "globals:\n  site: raydor\nindex.html:\n  template: templates/index.html\n  vars:\n    posts: src/blog/*.md\nposts/%.html:\n  generator: src/blog/%.md\n  template: templates/post.html\n",
        )
        .unwrap();

    fs::create_dir_all(site.output_dir()).unwrap();
    fs::write(site.output_dir().join("old.html"), "stale").unwrap();

    raydor(&site).assert().success();
    assert!(!site.output_exists("old.html"));
    let first = site.read_output("index.html").unwrap();
    let post = site.read_output("posts/test.html").unwrap();

    raydor(&site).assert().success();
    assert_eq!(site.read_output("index.html").unwrap(), first);
    assert_eq!(site.read_output("posts/test.html").unwrap(), post);
}

/// The default output directory is `output` in the working directory
#[test]
fn test_default_output_directory() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("robots.txt", "User-agent: *")
        .unwrap()
        .with_manifest("robots.txt: robots.txt\n")
        .unwrap();
    let workdir = tempfile::TempDir::new().unwrap();

    assert_cmd::Command::cargo_bin("raydor")
        .unwrap()
        .current_dir(workdir.path())
        .arg(site.manifest_path())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(workdir.path().join("output/robots.txt")).unwrap(),
        "User-agent: *"
    );
}

/// Library API: templates resolve relative to the manifest directory
#[test]
fn test_templates_resolve_from_site_root() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("templates/partials/nav.html", "<nav>{{ site }}</nav>")
        .unwrap()
        .with_file(
            "templates/page.html",
            r#"{% include "templates/partials/nav.html" %}<main>{{ body }}</main>"#,
        )
        .unwrap()
        .with_manifest(
            "globals:\n  site: raydor\nabout/index.html:\n  template: templates/page.html\n  vars:\n    body: About\n",
        )
        .unwrap();

    let summary = site.build().unwrap();
    assert_eq!(summary.rendered, 1);
    assert_eq!(
        site.read_output("about/index.html").unwrap(),
        "<nav>raydor</nav><main>About</main>"
    );
}
