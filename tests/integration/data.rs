use raydor::test_utils::SiteFixture;

use crate::common::raydor;

/// Path-like strings in vars become the loaded data
#[test]
fn test_vars_load_files_and_globs() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file(
            "templates/index.html",
            "{{ about.name }}|{% for p in projects %}{{ p.name }},{% endfor %}|{{ note }}|{% if everything is string %}string{% endif %}",
        )
        .unwrap()
        .with_file("data/about.yaml", "name: Joel\n")
        .unwrap()
        .with_file("data/projects/b.json", r#"{"name": "beta"}"#)
        .unwrap()
        .with_file("data/projects/a.json", r#"{"name": "alpha"}"#)
        .unwrap()
        .with_file("data/projects/c.yaml", "name: gamma\n")
        .unwrap()
        .with_manifest(
            "index.html:\n  template: templates/index.html\n  vars:\n    about: data/about.yaml\n    projects: data/projects/*.json\n    everything: data/projects/*\n    note: see notes.txt\n",
        )
        .unwrap();

    raydor(&site).assert().success();
    assert_eq!(site.read_output("index.html").unwrap(), "Joel|alpha,beta,|see notes.txt|string");
}

/// `!load` pulls whole files into the manifest and into data files
#[test]
fn test_load_tag_in_globals_and_data() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file(
            "templates/index.html",
            "{% for item in nav %}{{ item.title }} {% endfor %}{{ footer.text }}",
        )
        .unwrap()
        .with_file("data/nav.yaml", "- title: Home\n- title: Blog\n")
        .unwrap()
        .with_file("data/layout.yaml", "footer: !load footer.json\n")
        .unwrap()
        .with_file("footer.json", r#"{"text": "bye"}"#)
        .unwrap()
        .with_manifest(
            "globals:\n  nav: !load data/nav.yaml\nindex.html:\n  template: templates/index.html\n  vars: data/layout.yaml\n",
        )
        .unwrap();

    site.build().unwrap();
    assert_eq!(site.read_output("index.html").unwrap(), "Home Blog bye");
}

/// Markdown pulled in with `!load` renders as-is, `filename` included
#[test]
fn test_load_tag_markdown_vars_and_globals() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file(
            "templates/t.html",
            "<h1>{{ title }}</h1>{{ content | safe }}<footer>{{ page.title }} {{ filename }}</footer>",
        )
        .unwrap()
        .with_file("src/about.md", "---\ntitle: About\n---\nHi\n")
        .unwrap()
        .with_file("src/footer.md", "---\ntitle: Footer\n---\n")
        .unwrap()
        .with_manifest(
            "globals:\n  page: !load src/footer.md\nabout.html:\n  template: templates/t.html\n  vars: !load src/about.md\n",
        )
        .unwrap();

    raydor(&site).assert().success();
    assert_eq!(
        site.read_output("about.html").unwrap(),
        "<h1>About</h1><p>Hi</p>\n<footer>Footer about.md</footer>"
    );
}

/// With the default policy globals replace page variables
#[test]
fn test_globals_override_by_default() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("templates/t.html", "{{ title }}")
        .unwrap()
        .with_manifest(
            "globals:\n  title: Site\nindex.html:\n  template: templates/t.html\n  vars:\n    title: Page\n",
        )
        .unwrap();

    site.build().unwrap();
    assert_eq!(site.read_output("index.html").unwrap(), "Site");
}

/// `globals_merge: fallback` only fills in missing variables
#[test]
fn test_globals_fallback() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file("templates/t.html", "{{ title }}/{{ lang }}")
        .unwrap()
        .with_manifest(
            "globals_merge: fallback\nglobals:\n  title: Site\n  lang: en\nindex.html:\n  template: templates/t.html\n  vars:\n    title: Page\n",
        )
        .unwrap();

    site.build().unwrap();
    assert_eq!(site.read_output("index.html").unwrap(), "Page/en");
}

/// Manifest Markdown options reach both loaded files and the `markdown` filter
#[test]
fn test_markdown_options_and_filters() {
    let site = SiteFixture::new()
        .unwrap()
        .with_file(
            "templates/post.html",
            "{{ content | safe }}{{ teaser | markdown }}<time>{{ date | datetime(fmt=\"%B %d, %Y\") }}</time>{{ summary | limit(delim=\".\", n=2) }}",
        )
        .unwrap()
        .with_file(
            "src/post.md",
            "---\ndate: 2024-03-01\nteaser: \"**(c)** me\"\nsummary: One. Two. Three.\n---\n```rust\nlet x = 1;\n```\n",
        )
        .unwrap()
        .with_manifest(
            "markdown_substitutions:\n  \"(c)\": \"&copy;\"\ncodehighlight:\n  style: monokai\npost.html:\n  template: templates/post.html\n  vars: src/post.md\n",
        )
        .unwrap();

    site.build().unwrap();
    let html = site.read_output("post.html").unwrap();

    assert!(html.contains(r#"<div class="codehilite" data-style="monokai">"#), "{html}");
    assert!(html.contains(r#"<code class="language-rust">let x = 1;"#), "{html}");
    assert!(html.contains("<p><strong>&copy;</strong> me</p>"), "{html}");
    assert!(html.contains("<time>March 01, 2024</time>"), "{html}");
    assert!(html.ends_with("One. Two. ..."), "{html}");
}
