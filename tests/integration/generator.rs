use predicates::prelude::*;
use raydor::test_utils::SiteFixture;

use crate::common::{blog_site, raydor};

const BLOG_MANIFEST: &str = "\
globals:
  site: My Blog
index.html:
  template: templates/index.html
  vars:
    posts: src/blog/*.md
posts/%.html:
  generator: src/blog/%.md
  template: templates/post.html
static/: static/
";

/// One page per post, the captured name substituted into the output path
#[test]
fn test_blog_posts_generated() {
    let site = blog_site().with_manifest(BLOG_MANIFEST).unwrap();

    raydor(&site)
        .assert()
        .success()
        .stdout(predicate::str::contains("posts/%.html.. done"))
        .stdout(predicate::str::contains("Built 3 entries: 1 rendered, 2 generated, 1 copied"));

    let post = site.read_output("posts/test.html").unwrap();
    assert_eq!(
        post,
        "<title>My Blog</title><h1>Test</h1><p>Hello <em>world</em></p>\n"
    );
    assert!(site.output_exists("posts/second.html"));
    assert!(site.output_exists("static/style.css"));
}

/// The index sees every post in sorted path order
#[test]
fn test_index_lists_posts_sorted() {
    let site = blog_site().with_manifest(BLOG_MANIFEST).unwrap();
    raydor(&site).assert().success();

    assert_eq!(
        site.read_output("index.html").unwrap(),
        r#"<title>My Blog</title><a href="posts/second.html">Second</a><a href="posts/test.html">Test</a>"#
    );
}

/// A generator that matches nothing renders nothing and still succeeds
#[test]
fn test_generator_without_matches() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("templates/post.html", "{{ title }}")
        .unwrap()
        .with_manifest("posts/%.html:\n  generator: src/blog/%.md\n  template: templates/post.html\n")
        .unwrap();

    let summary = site.build().unwrap();
    assert_eq!(summary.entries, 1);
    assert_eq!(summary.generated, 0);
    assert!(!site.output_exists("posts"));
}

/// Generator defaults sit below the file's own data and globals
#[test]
fn test_generator_variable_layering() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("templates/p.html", "{{ title }}|{{ section }}|{{ site }}")
        .unwrap()
        .with_file("data/projects/raydor.json", r#"{"title": "raydor", "site": "ignored"}"#)
        .unwrap()
        .with_file("data/projects/other.yaml", "title: other\n")
        .unwrap()
        .with_manifest(
            "globals:\n  site: main\nprojects/%.html:\n  generator: data/projects/%.json\n  template: templates/p.html\n  vars:\n    section: projects\n    title: untitled\n",
        )
        .unwrap();

    site.build().unwrap();
    assert_eq!(site.read_output("projects/raydor.html").unwrap(), "raydor|projects|main");
    assert!(!site.output_exists("projects/other.html"));
}

/// The capture may sit mid-name but never crosses a directory
#[test]
fn test_capture_within_one_directory() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("templates/p.html", "{{ title }}")
        .unwrap()
        .with_file("src/2024/intro.post.md", "---\ntitle: Intro\n---\n")
        .unwrap()
        .with_manifest("'%/index.html':\n  generator: src/%.post.md\n  template: templates/p.html\n")
        .unwrap();

    let summary = site.build().unwrap();
    assert_eq!(summary.generated, 0);

    let site = site
        .with_file("src/about.post.md", "---\ntitle: About\n---\n")
        .unwrap();
    let summary = site.build().unwrap();
    assert_eq!(summary.generated, 1);
    assert_eq!(site.read_output("about/index.html").unwrap(), "About");
}
