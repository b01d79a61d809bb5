//! [`TestProject`] builder for configuration test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory with helpers to write configuration files
/// and test files.
///
/// # Example
///
/// ```rust,no_run
/// use runcfg_test_utils::project::TestProject;
///
/// let project = TestProject::new();
/// project.file("tests/unit/FooTest.php", "<?php");
/// let config = project.config("phpunit.xml", r#"<phpunit colors="true"/>"#);
/// assert!(config.exists());
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Canonical root path, matching the paths the resolver reports.
    pub fn canonical_root(&self) -> PathBuf {
        self.root().canonicalize().unwrap()
    }

    /// Write `content` to `path` (relative to the root), creating parent
    /// directories, and return the full path.
    pub fn file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Write a configuration document, prefixing the XML declaration when
    /// `xml` does not carry one.
    pub fn config(&self, path: &str, xml: &str) -> PathBuf {
        if xml.trim_start().starts_with("<?xml") {
            self.file(path, xml)
        } else {
            self.file(path, &format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{xml}\n"))
        }
    }

    /// Write empty PHP test files at each of `paths`.
    pub fn test_files(&self, paths: &[&str]) {
        for path in paths {
            self.file(path, "<?php\n");
        }
    }
}
