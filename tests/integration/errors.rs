use predicates::prelude::*;
use raydor::core::RaydorError;
use raydor::test_utils::SiteFixture;

use crate::common::raydor;

fn post_site(post: &str) -> SiteFixture {
    SiteFixture::new()
        .unwrap()
        .with_file("templates/post.html", "{{ title }}")
        .unwrap()
        .with_file("src/blog/test.md", post)
        .unwrap()
        .with_manifest("posts/%.html:\n  generator: src/blog/%.md\n  template: templates/post.html\n")
        .unwrap()
}

/// Markdown without frontmatter fails the build with a hint
#[test]
fn test_markdown_without_frontmatter() {
    let site = post_site("# Just a heading\n");

    raydor(&site)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Malformed document"))
        .stderr(predicate::str::contains("test.md"))
        .stderr(predicate::str::contains("'---'"));
}

/// Missing templates are named, with a close match suggested
#[test]
fn test_template_not_found() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("templates/post.html", "{{ title }}")
        .unwrap()
        .with_manifest("index.html:\n  template: templates/posts.html\n")
        .unwrap();

    raydor(&site)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template not found: templates/posts.html"))
        .stderr(predicate::str::contains("templates/post.html"));
}

/// Mutual `!load` references are reported as a cycle instead of recursing
#[test]
fn test_load_cycle() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("templates/t.html", "{{ a }}")
        .unwrap()
        .with_file("a.yaml", "b: !load b.yaml\n")
        .unwrap()
        .with_file("b.yaml", "a: !load a.yaml\n")
        .unwrap()
        .with_manifest("index.html:\n  template: templates/t.html\n  vars:\n    a: a.yaml\n")
        .unwrap();

    raydor(&site)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular reference detected: a.yaml -> b.yaml -> a.yaml"));
}

/// A manifest that is not a mapping is rejected before anything is written
#[test]
fn test_manifest_not_a_mapping() {
    let site = SiteFixture::new().unwrap().with_manifest("- index.html\n").unwrap();

    raydor(&site)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse manifest"));
    assert!(!site.output_exists(""));
}

/// Unknown manifest extensions and missing manifests fail cleanly
#[test]
fn test_bad_manifest_paths() {
    let site = SiteFixture::new()
        .unwrap()
        .with_manifest_named("site.toml", "title = 1\n")
        .unwrap();
    raydor(&site).assert().failure().code(1);

    assert_cmd::Command::cargo_bin("raydor")
        .unwrap()
        .arg(site.root().join("missing.yaml"))
        .arg("-o")
        .arg(site.output_dir())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

/// Output keys may not escape the output directory
#[test]
fn test_traversal_in_output_key() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("a.txt", "a")
        .unwrap()
        .with_manifest("../escape.txt: a.txt\n")
        .unwrap();

    raydor(&site)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid manifest entry '../escape.txt'"));
}

/// Generated pages need mapping data
#[test]
fn test_generator_source_not_a_mapping() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("templates/p.html", "{{ title }}")
        .unwrap()
        .with_file("data/list.json", "[1, 2, 3]")
        .unwrap()
        .with_manifest("\"%.html\":\n  generator: data/%.json\n  template: templates/p.html\n")
        .unwrap();

    let error = site.build().unwrap_err();
    match error.downcast_ref::<RaydorError>() {
        Some(RaydorError::InvalidVariables { output, found }) => {
            assert_eq!(output, "list.html");
            assert_eq!(found, "sequence");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Copying a source that does not exist
#[test]
fn test_copy_missing_source() {
    let site = SiteFixture::new().unwrap().with_manifest("static/: static/\n").unwrap();

    raydor(&site)
        .assert()
        .failure()
        .stdout(predicate::str::contains("static/.. "))
        .stderr(predicate::str::contains("Source not found"));
}
