//! Sandbox path codec
//!
//! Worker nodes lay out one directory per job run using a fixed scheme:
//!
//! ```text
//! {root}/slaves/{slave_id}/frameworks/{framework_id}/executors/{executor_id}/runs/{run_id}
//! ```
//!
//! This module converts between that layout and [`SandboxLocation`], finds
//! the sandbox root enclosing an arbitrary path, and enumerates the sandboxes
//! present under a directory.
//!
//! Symlinks are never followed. Ancestor search is purely lexical and the
//! scan does not descend through symlinked directories.

use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const SLAVES: &str = "slaves";
const FRAMEWORKS: &str = "frameworks";
const EXECUTORS: &str = "executors";
const RUNS: &str = "runs";

/// Number of segments following the root: four literals and four ids
const TEMPLATE_LEN: usize = 8;

/// Errors raised when building a sandbox path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SandboxError {
    /// A field is empty or would span more than one path segment
    #[error("invalid {field} segment '{value}'")]
    InvalidSegment { field: &'static str, value: String },
}

/// Location of one run sandbox on a worker node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SandboxLocation {
    /// Directory containing the `slaves` tree. May span several segments.
    pub root: String,
    pub slave_id: String,
    pub framework_id: String,
    pub executor_id: String,
    pub run_id: String,
}

impl SandboxLocation {
    pub fn new(
        root: impl Into<String>,
        slave_id: impl Into<String>,
        framework_id: impl Into<String>,
        executor_id: impl Into<String>,
        run_id: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            slave_id: slave_id.into(),
            framework_id: framework_id.into(),
            executor_id: executor_id.into(),
            run_id: run_id.into(),
        }
    }

    /// Encode this location as a sandbox directory path
    ///
    /// # Errors
    /// Returns [`SandboxError::InvalidSegment`] if the root is empty, or if an
    /// id is empty or contains a path separator.
    pub fn path(&self) -> Result<PathBuf, SandboxError> {
        if self.root.is_empty() {
            return Err(SandboxError::InvalidSegment {
                field: "root",
                value: self.root.clone(),
            });
        }

        let ids = [
            ("slave_id", &self.slave_id),
            ("framework_id", &self.framework_id),
            ("executor_id", &self.executor_id),
            ("run_id", &self.run_id),
        ];
        for (field, value) in ids {
            if value.is_empty() || value.contains(std::path::is_separator) {
                return Err(SandboxError::InvalidSegment {
                    field,
                    value: value.clone(),
                });
            }
        }

        let mut path = PathBuf::from(&self.root);
        for segment in [
            SLAVES,
            self.slave_id.as_str(),
            FRAMEWORKS,
            self.framework_id.as_str(),
            EXECUTORS,
            self.executor_id.as_str(),
            RUNS,
            self.run_id.as_str(),
        ] {
            path.push(segment);
        }
        Ok(path)
    }

    /// Decode a path that starts with a sandbox directory
    ///
    /// Components following the run id are ignored, so any path inside a
    /// sandbox decodes to that sandbox. Returns `None` for anything that does
    /// not follow the layout, including paths with an empty segment.
    pub fn decode(path: impl AsRef<Path>) -> Option<Self> {
        match_prefix(path.as_ref()).map(|m| m.location)
    }

    /// Whether every id set on `filter` equals the corresponding field
    pub fn matches(&self, filter: &SandboxFilter) -> bool {
        let check = |wanted: &Option<String>, actual: &str| {
            wanted.as_deref().is_none_or(|w| w == actual)
        };

        check(&filter.slave_id, &self.slave_id)
            && check(&filter.framework_id, &self.framework_id)
            && check(&filter.executor_id, &self.executor_id)
            && check(&filter.run_id, &self.run_id)
    }
}

impl std::fmt::Display for SandboxLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.slave_id, self.framework_id, self.executor_id, self.run_id
        )
    }
}

/// Optional id constraints applied to scanned sandboxes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SandboxFilter {
    pub slave_id: Option<String>,
    pub framework_id: Option<String>,
    pub executor_id: Option<String>,
    pub run_id: Option<String>,
}

struct PrefixMatch {
    location: SandboxLocation,
    /// Non-empty components after the run id
    trailing: usize,
}

fn match_prefix(path: &Path) -> Option<PrefixMatch> {
    let text = path.to_str()?;
    // Repeated leading separators all denote the file-system root.
    let relative = text.trim_start_matches(std::path::is_separator);
    let absolute = relative.len() != text.len();
    let segments: Vec<&str> = relative.split(std::path::is_separator).collect();

    // The root absorbs everything before the deepest occurrence of the layout.
    let last_start = segments.len().checked_sub(TEMPLATE_LEN)?;
    for start in (1..=last_start).rev() {
        let window = &segments[start..start + TEMPLATE_LEN];
        let [SLAVES, slave_id, FRAMEWORKS, framework_id, EXECUTORS, executor_id, RUNS, run_id] =
            *window
        else {
            continue;
        };
        if [slave_id, framework_id, executor_id, run_id]
            .iter()
            .any(|id| id.is_empty())
        {
            continue;
        }

        let root = &segments[..start];
        if root.iter().any(|s| s.is_empty()) {
            continue;
        }
        let root = root.join(MAIN_SEPARATOR_STR);
        let root = if absolute {
            format!("{}{}", MAIN_SEPARATOR_STR, root)
        } else {
            root
        };

        let trailing = segments[start + TEMPLATE_LEN..]
            .iter()
            .filter(|s| !s.is_empty())
            .count();

        return Some(PrefixMatch {
            location: SandboxLocation::new(root, slave_id, framework_id, executor_id, run_id),
            trailing,
        });
    }

    None
}

/// Find the sandbox root enclosing `path`
///
/// Tries `path` itself and then each of its ancestors, returning the root of
/// the first one that decodes.
pub fn find_root(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .ancestors()
        .find_map(|ancestor| SandboxLocation::decode(ancestor))
        .map(|location| location.root)
}

/// Enumerate the run sandboxes below `root_dir`
///
/// Yielded roots are absolute, with any run of leading separators collapsed
/// to one. The walk is lazy and does not descend into run directories, so each
/// sandbox is yielded exactly once. Unreadable or vanished entries are skipped.
pub fn scan(root_dir: impl AsRef<Path>) -> SandboxScan {
    let root_dir = root_dir.as_ref();
    let root_dir = std::path::absolute(root_dir).unwrap_or_else(|_| root_dir.to_path_buf());

    SandboxScan {
        walker: walkdir::WalkDir::new(root_dir)
            .follow_links(false)
            .into_iter(),
    }
}

/// Iterator returned by [`scan`]
pub struct SandboxScan {
    walker: walkdir::IntoIter,
}

impl Iterator for SandboxScan {
    type Item = SandboxLocation;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping entry during sandbox scan: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            if let Some(PrefixMatch {
                location,
                trailing: 0,
            }) = match_prefix(entry.path())
            {
                self.walker.skip_current_dir();
                return Some(location);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    fn default_location() -> SandboxLocation {
        SandboxLocation::new("abcd", "slave", "framework", "executor", "run")
    }

    #[test]
    fn test_encode() {
        let path = default_location().path().unwrap();
        assert_eq!(
            path,
            Path::new("abcd/slaves/slave/frameworks/framework/executors/executor/runs/run")
        );
    }

    #[test]
    fn test_decode_inverts_encode() {
        let location = default_location();
        let path = location.path().unwrap();
        assert_eq!(SandboxLocation::decode(&path), Some(location));

        let absolute = SandboxLocation::new("/var/lib/mesos", "S0", "F1", "thermos-1", "latest");
        assert_eq!(
            SandboxLocation::decode(absolute.path().unwrap()),
            Some(absolute)
        );
    }

    #[test]
    fn test_encode_rejects_bad_segments() {
        let mut location = default_location();
        location.executor_id = String::new();
        assert_eq!(
            location.path(),
            Err(SandboxError::InvalidSegment {
                field: "executor_id",
                value: String::new()
            })
        );

        let mut location = default_location();
        location.run_id = "a/b".to_string();
        assert!(location.path().is_err());

        let mut location = default_location();
        location.root = String::new();
        assert!(location.path().is_err());
    }

    #[test]
    fn test_decode_rejects_bad_paths() {
        for path in [
            "herpderp",
            "/",
            "",
            "/root/slaves",
            "/root/slaves/S/frameworks/F/executors//runs/R",
            "root/slaves/S/frameworks/F/executors//runs/R",
            "/slaves/S/frameworks/F/executors/E/runs/R",
            "/a//b/slaves/S/frameworks/F/executors/E/runs/R",
            "root/slaves/S/frameworks/F/executors/E/runs",
            "root/slaves/S/frameworks/F/executors/E/runs/",
            "root/slave/S/frameworks/F/executors/E/runs/R",
        ] {
            assert_eq!(SandboxLocation::decode(path), None, "{path}");
        }
    }

    #[test]
    fn test_decode_ignores_trailing_components() {
        let decoded =
            SandboxLocation::decode("/root/slaves/S/frameworks/F/executors/E/runs/R/sandbox/x.log")
                .unwrap();
        assert_eq!(
            decoded,
            SandboxLocation::new("/root", "S", "F", "E", "R")
        );
    }

    #[test]
    fn test_decode_uses_deepest_layout() {
        let decoded = SandboxLocation::decode(
            "a/slaves/1/frameworks/2/executors/3/runs/4/slaves/5/frameworks/6/executors/7/runs/8",
        )
        .unwrap();
        assert_eq!(decoded.root, "a/slaves/1/frameworks/2/executors/3/runs/4");
        assert_eq!(decoded.run_id, "8");
    }

    #[test]
    fn test_find_root() {
        let bad_paths = [
            "/".to_string(),
            ".".to_string(),
            "/".repeat(10),
            "/root/slaves".to_string(),
            "/root/slaves/S/frameworks/F/executors//runs/R".to_string(),
            "root/slaves/S/frameworks/F/executors//runs/R".to_string(),
        ];
        for path in &bad_paths {
            assert_eq!(find_root(path), None, "{path}");
        }

        let path = default_location().path().unwrap();
        assert_eq!(find_root(&path), Some("abcd".to_string()));
        assert_eq!(
            find_root(path.join("some").join("other").join("path")),
            Some("abcd".to_string())
        );
    }

    #[test]
    fn test_leading_separators_collapse() {
        let decoded =
            SandboxLocation::decode("//tmp/x/slaves/S/frameworks/F/executors/E/runs/R/x").unwrap();
        assert_eq!(decoded.root, "/tmp/x");
        assert_eq!(
            find_root("///tmp/x/slaves/S/frameworks/F/executors/E/runs/R"),
            Some("/tmp/x".to_string())
        );
        assert_eq!(
            SandboxLocation::decode("//slaves/S/frameworks/F/executors/E/runs/R"),
            None
        );
    }

    #[test]
    fn test_filter() {
        let location = default_location();
        assert!(location.matches(&SandboxFilter::default()));

        let filter = SandboxFilter {
            slave_id: Some("slave".to_string()),
            run_id: Some("run".to_string()),
            ..Default::default()
        };
        assert!(location.matches(&filter));

        let filter = SandboxFilter {
            executor_id: Some("other".to_string()),
            ..Default::default()
        };
        assert!(!location.matches(&filter));
    }

    #[test]
    fn test_scan_finds_every_sandbox_once() {
        let td = tempfile::tempdir().unwrap();
        let root = td.path().to_str().unwrap().to_string();

        let mut expected = HashSet::new();
        for slave in ["slave001", "slave123"] {
            for framework in ["framework1", "framework2"] {
                for executor in ["executor_a", "executor_b"] {
                    for run in ["001", "002", "latest"] {
                        let location =
                            SandboxLocation::new(root.clone(), slave, framework, executor, run);
                        let path = location.path().unwrap();
                        fs::create_dir_all(path.join("sandbox").join("logs")).unwrap();
                        fs::write(path.join("stdout"), b"hello").unwrap();
                        expected.insert(location);
                    }
                }
            }
        }

        let found: Vec<SandboxLocation> = scan(td.path()).collect();
        assert_eq!(found.len(), expected.len());
        assert_eq!(found.into_iter().collect::<HashSet<_>>(), expected);
    }

    #[test]
    fn test_scan_skips_partial_layouts() {
        let td = tempfile::tempdir().unwrap();
        fs::create_dir_all(td.path().join("slaves/S/frameworks/F/executors/E/runs")).unwrap();
        fs::create_dir_all(td.path().join("unrelated/dir")).unwrap();
        fs::write(
            td.path().join("slaves/S/frameworks/F/executors/E/runs/not-a-dir"),
            b"",
        )
        .unwrap();

        assert_eq!(scan(td.path()).count(), 0);
    }

    #[test]
    fn test_scan_through_doubled_leading_separator() {
        let td = tempfile::tempdir().unwrap();
        let root = td.path().to_str().unwrap().to_string();
        let location = SandboxLocation::new(root.clone(), "S", "F", "E", "R");
        fs::create_dir_all(location.path().unwrap()).unwrap();

        let doubled = format!("/{}", root);
        let found: Vec<_> = scan(&doubled).collect();
        assert_eq!(found, vec![location]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_ignores_symlinked_run() {
        let td = tempfile::tempdir().unwrap();
        let root = td.path().to_str().unwrap().to_string();
        let location = SandboxLocation::new(root.clone(), "S", "F", "E", "R");
        let run_dir = location.path().unwrap();
        fs::create_dir_all(&run_dir).unwrap();
        std::os::unix::fs::symlink(&run_dir, run_dir.with_file_name("latest")).unwrap();

        let outside = tempfile::tempdir().unwrap();
        fs::create_dir_all(
            outside
                .path()
                .join("slaves/S2/frameworks/F/executors/E/runs/R"),
        )
        .unwrap();
        std::os::unix::fs::symlink(outside.path().join("slaves"), td.path().join("linked"))
            .unwrap();

        let runs: Vec<String> = scan(td.path()).map(|l| l.run_id).collect();
        assert_eq!(runs, vec!["R".to_string()]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let td = tempfile::tempdir().unwrap();
        assert_eq!(scan(td.path().join("does-not-exist")).count(), 0);
    }

    #[test]
    fn test_scan_with_filter() {
        let td = tempfile::tempdir().unwrap();
        let root = td.path().to_str().unwrap().to_string();
        for run in ["1", "2"] {
            let location = SandboxLocation::new(root.clone(), "S", "F", "E", run);
            fs::create_dir_all(location.path().unwrap()).unwrap();
        }

        let filter = SandboxFilter {
            run_id: Some("2".to_string()),
            ..Default::default()
        };
        let found: Vec<_> = scan(td.path()).filter(|l| l.matches(&filter)).collect();
        assert_eq!(found, vec![SandboxLocation::new(root, "S", "F", "E", "2")]);
    }
}
