//! Shared helpers for the integration suite.

use assert_cmd::Command;
use raydor::test_utils::SiteFixture;

/// A `raydor` command building `site` into its fixture output directory.
pub fn raydor(site: &SiteFixture) -> Command {
    let mut cmd = Command::cargo_bin("raydor").expect("raydor binary is built");
    cmd.arg(site.manifest_path())
        .arg("--output")
        .arg(site.output_dir())
        .env_remove("RUST_LOG");
    cmd
}

/// The two-template blog used by several tests.
pub fn blog_site() -> SiteFixture {
    SiteFixture::new()
        .unwrap()
        .with_file(
            "templates/base.html",
            "<title>{{ site }}</title>{% block body %}{% endblock body %}",
        )
        .unwrap()
        .with_file(
            "templates/index.html",
            r#"{% extends "templates/base.html" %}{% block body %}{% for post in posts %}<a href="posts/{{ post.filename | replace(from=".md", to=".html") }}">{{ post.title }}</a>{% endfor %}{% endblock body %}"#,
        )
        .unwrap()
        .with_file(
            "templates/post.html",
            r#"{% extends "templates/base.html" %}{% block body %}<h1>{{ title }}</h1>{{ content | safe }}{% endblock body %}"#,
        )
        .unwrap()
        .with_file("src/blog/test.md", "---\ntitle: Test\ndate: 2024-03-01\n---\nHello *world*\n")
        .unwrap()
        .with_file("src/blog/second.md", "---\ntitle: Second\n---\nAgain\n")
        .unwrap()
        .with_file("static/style.css", "body { margin: 0 }")
        .unwrap()
        .with_file("static/img/logo.svg", "<svg/>")
        .unwrap()
}
