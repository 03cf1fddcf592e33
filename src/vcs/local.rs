use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use super::VcsDetector;

/// Entries that mark the top of a git, Mercurial, Subversion, Bazaar or
/// Fossil checkout.
const VCS_MARKERS: &[&str] = &[".git", ".hg", ".svn", ".bzr", ".fossil", "_FOSSIL_"];

/// Looks for checkouts laid out by import path under `search_root`
/// (a GOPATH-style `src/` tree, a vendor directory, or the working directory).
pub struct LocalDetector {
    search_root: PathBuf,
}

impl LocalDetector {
    pub fn new(search_root: impl Into<PathBuf>) -> Self {
        Self {
            search_root: search_root.into(),
        }
    }
}

impl VcsDetector for LocalDetector {
    fn detect_root(&self, project: &str) -> Result<Option<String>> {
        let rel = Path::new(project);
        // Only plain relative paths can name a directory below the root.
        if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
            return Ok(None);
        }

        let start = self.search_root.join(rel);
        if !start.is_dir() {
            return Ok(None);
        }

        // Walk upward, stopping before the search root itself.
        let mut segments: Vec<&str> = project.split('/').filter(|s| !s.is_empty()).collect();
        while !segments.is_empty() {
            let dir = self.search_root.join(segments.join("/"));
            for marker in VCS_MARKERS {
                let candidate = dir.join(marker);
                match std::fs::symlink_metadata(&candidate) {
                    Ok(_) => return Ok(Some(segments.join("/"))),
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => {
                        return Err(e)
                            .with_context(|| format!("checking {}", candidate.display()));
                    }
                }
            }
            segments.pop();
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_enclosing_checkout() {
        let root = tempfile::tempdir().unwrap();
        let pkg = root.path().join("example.com/group/repo/sub/pkg");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::create_dir(root.path().join("example.com/group/repo/.git")).unwrap();

        let detector = LocalDetector::new(root.path());
        assert_eq!(
            detector.detect_root("example.com/group/repo/sub/pkg").unwrap().as_deref(),
            Some("example.com/group/repo")
        );
        assert_eq!(
            detector.detect_root("example.com/group/repo").unwrap().as_deref(),
            Some("example.com/group/repo")
        );
    }

    #[test]
    fn test_ignores_search_root_checkout() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join(".git")).unwrap();
        std::fs::create_dir_all(root.path().join("example.com/lib")).unwrap();

        let detector = LocalDetector::new(root.path());
        assert_eq!(detector.detect_root("example.com/lib").unwrap(), None);
    }

    #[test]
    fn test_missing_or_unsafe_paths() {
        let root = tempfile::tempdir().unwrap();
        let detector = LocalDetector::new(root.path());
        assert_eq!(detector.detect_root("example.com/absent").unwrap(), None);
        assert_eq!(detector.detect_root("../escape").unwrap(), None);
        assert_eq!(detector.detect_root("/etc").unwrap(), None);
    }

    #[test]
    fn test_hg_marker_file() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("bitbucket.org/o/r")).unwrap();
        std::fs::write(root.path().join("bitbucket.org/o/r/.hg"), "").unwrap();

        let detector = LocalDetector::new(root.path());
        assert_eq!(
            detector.detect_root("bitbucket.org/o/r").unwrap().as_deref(),
            Some("bitbucket.org/o/r")
        );
    }
}
