//! Site fixtures on temporary directories.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::build::{BuildSummary, SiteBuilder};
use crate::manifest::Manifest;

/// Canned manifests for common site shapes.
#[derive(Clone, Debug)]
pub struct ManifestFixture {
    pub name: String,
    pub content: String,
}

impl ManifestFixture {
    /// One rendered page with inline variables.
    pub fn hello() -> Self {
        Self {
            name: "hello".to_string(),
            content: r"
index.html:
  template: templates/index.html
  vars:
    title: Hello
"
            .trim_start()
            .to_string(),
        }
    }

    /// A blog: an index over every post plus one page per post.
    pub fn blog() -> Self {
        Self {
            name: "blog".to_string(),
            content: r"
globals:
  site: raydor
index.html:
  template: templates/index.html
  vars:
    posts: src/blog/*.md
posts/%.html:
  generator: src/blog/%.md
  template: templates/post.html
static/: static/
"
            .trim_start()
            .to_string(),
        }
    }
}

/// A site laid out in a temporary directory.
///
/// The site root is `<temp>/site`; builds go to `<temp>/output` so that the
/// output never overlaps the sources.
pub struct SiteFixture {
    temp_dir: TempDir,
    root: PathBuf,
    manifest_path: PathBuf,
}

impl SiteFixture {
    /// Create an empty site.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("site");
        fs::create_dir_all(&root)?;
        let manifest_path = root.join("site.yaml");

        Ok(Self {
            temp_dir,
            root,
            manifest_path,
        })
    }

    /// Add a file below the site root, creating parent directories.
    pub fn with_file(self, path: &str, content: &str) -> Result<Self> {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, content)
            .with_context(|| format!("Failed to write fixture file {path}"))?;
        Ok(self)
    }

    /// Write `content` as the manifest, `site.yaml`.
    pub fn with_manifest(self, content: &str) -> Result<Self> {
        fs::write(&self.manifest_path, content)?;
        Ok(self)
    }

    /// Write `content` as the manifest under a different file name.
    pub fn with_manifest_named(mut self, name: &str, content: &str) -> Result<Self> {
        self.manifest_path = self.root.join(name);
        fs::write(&self.manifest_path, content)?;
        Ok(self)
    }

    /// The site root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The manifest file.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// The default output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.temp_dir.path().join("output")
    }

    /// Load the manifest and build into [`output_dir`](Self::output_dir),
    /// discarding progress output.
    pub fn build(&self) -> Result<BuildSummary> {
        let manifest = Manifest::load(&self.manifest_path)?;
        SiteBuilder::new(&manifest, self.output_dir()).build(&mut std::io::sink())
    }

    /// Read a built file.
    pub fn read_output(&self, path: &str) -> Result<String> {
        let full_path = self.output_dir().join(path);
        fs::read_to_string(&full_path)
            .with_context(|| format!("Failed to read output {}", full_path.display()))
    }

    /// Whether a built file or directory exists.
    pub fn output_exists(&self, path: &str) -> bool {
        self.output_dir().join(path).exists()
    }
}
