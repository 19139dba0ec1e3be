//! Path validation: filesystem sandboxing to a workspace root.
//!
//! File tools take paths relative to a configured root directory and must
//! never touch anything outside it, whether through `..` components,
//! absolute paths, or symlinks.

use std::path::{Component, Path, PathBuf};

/// Error returned when path validation fails.
#[derive(Debug, thiserror::Error)]
pub enum PathValidationError {
    #[error("Path '{path}' is outside the workspace root")]
    OutsideRoot { path: String },

    #[error("Path is empty")]
    Empty,

    #[error("Failed to canonicalize path '{path}': {reason}")]
    CanonicalizeFailed { path: String, reason: String },
}

/// Resolve `requested` relative to `root` and ensure it stays inside it.
///
/// Checks:
/// 1. `.` and `..` components are folded lexically
/// 2. The longest existing prefix is canonicalized to resolve symlinks
/// 3. The result is the root itself or lies beneath it
///
/// Absolute paths are joined the way `Path::join` does (they replace the
/// root), so they pass only when they already point inside the root.
/// The root must exist. Returns the resolved path on success.
pub fn resolve_in_root(root: &Path, requested: &str) -> Result<PathBuf, PathValidationError> {
    if requested.trim().is_empty() {
        return Err(PathValidationError::Empty);
    }

    let canonical_root = root
        .canonicalize()
        .map_err(|e| PathValidationError::CanonicalizeFailed {
            path: root.display().to_string(),
            reason: e.to_string(),
        })?;

    let joined = normalize(&canonical_root.join(requested));
    let resolved = canonicalize_existing_prefix(&joined).map_err(|reason| {
        PathValidationError::CanonicalizeFailed {
            path: requested.into(),
            reason,
        }
    })?;

    if resolved.starts_with(&canonical_root) {
        Ok(resolved)
    } else {
        tracing::warn!(path = %requested, root = %canonical_root.display(), "Path escapes workspace root");
        Err(PathValidationError::OutsideRoot {
            path: requested.into(),
        })
    }
}

/// Fold `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize the deepest ancestor that exists and re-append the rest.
fn canonicalize_existing_prefix(path: &Path) -> Result<PathBuf, String> {
    let mut existing = path;
    let mut tail: Vec<&std::ffi::OsStr> = Vec::new();

    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name);
                existing = parent;
            }
            _ => return Ok(path.to_path_buf()),
        }
    }

    let mut resolved = existing.canonicalize().map_err(|e| e.to_string())?;
    for name in tail.into_iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_resolves_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hi").unwrap();

        let resolved = resolve_in_root(dir.path(), "notes.txt").unwrap();
        assert_eq!(resolved, dir.path().canonicalize().unwrap().join("notes.txt"));
    }

    #[test]
    fn missing_file_in_missing_subdir_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_in_root(dir.path(), "a/b/new.txt").unwrap();
        assert!(resolved.ends_with("a/b/new.txt"));
        assert!(resolved.starts_with(dir.path().canonicalize().unwrap()));
    }

    #[test]
    fn dot_dot_inside_root_is_folded() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_in_root(dir.path(), "sub/../file.txt").unwrap();
        assert_eq!(resolved, dir.path().canonicalize().unwrap().join("file.txt"));
    }

    #[test]
    fn traversal_out_of_root_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_in_root(dir.path(), "../../../etc/passwd");
        match result.unwrap_err() {
            PathValidationError::OutsideRoot { path } => assert_eq!(path, "../../../etc/passwd"),
            other => panic!("Expected OutsideRoot, got: {other}"),
        }
    }

    #[test]
    fn absolute_path_outside_root_blocked() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            resolve_in_root(dir.path(), "/etc/passwd"),
            Err(PathValidationError::OutsideRoot { .. })
        ));
    }

    #[test]
    fn root_itself_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_in_root(dir.path(), ".").unwrap();
        assert_eq!(resolved, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn sibling_with_common_prefix_blocked() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("work");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(parent.path().join("workshop")).unwrap();

        assert!(resolve_in_root(&root, "../workshop/x.txt").is_err());
    }

    #[test]
    fn empty_path_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            resolve_in_root(dir.path(), "  "),
            Err(PathValidationError::Empty)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escape_blocked() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "s3cret").unwrap();

        let root = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), root.path().join("link")).unwrap();

        assert!(resolve_in_root(root.path(), "link/secret.txt").is_err());
    }
}
