//! Path sandbox: confines logical keys to the storage root.
//!
//! Resolution is purely lexical. A rejected key never reaches the filesystem,
//! and a rejection message never echoes the key itself.

use std::path::{Component, Path, PathBuf};

use crate::traits::{StorageError, StorageResult};

#[derive(Debug, Clone)]
pub struct PathSandbox {
    root: PathBuf,
}

impl PathSandbox {
    /// Create a sandbox around `root`. The root should already be absolute and
    /// canonical; [`LocalAssetStore::new`](crate::LocalAssetStore::new) takes care of that.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a logical key to an absolute path under the root.
    pub fn resolve(&self, logical_key: &str) -> StorageResult<PathBuf> {
        if logical_key.is_empty() {
            return Err(invalid("key is empty"));
        }
        if logical_key.contains('\\') || logical_key.contains('\0') {
            return Err(invalid("key contains a forbidden character"));
        }

        let mut resolved = self.root.clone();
        for component in Path::new(logical_key).components() {
            match component {
                Component::Normal(segment) => resolved.push(segment),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(invalid("key contains a parent directory segment"))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("key is absolute"))
                }
            }
        }

        // The root itself is never addressable: removing it would wipe every asset.
        if resolved == self.root || !resolved.starts_with(&self.root) {
            return Err(invalid("key resolves outside the storage root"));
        }

        Ok(resolved)
    }
}

fn invalid(reason: &str) -> StorageError {
    StorageError::InvalidPath(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> PathSandbox {
        // Never created on disk: resolution must not need it.
        PathSandbox::new("/nonexistent/cadenza-root")
    }

    #[test]
    fn test_resolves_nested_key_under_root() {
        let path = sandbox().resolve("tracks/abc/original").unwrap();
        assert_eq!(path, PathBuf::from("/nonexistent/cadenza-root/tracks/abc/original"));
    }

    #[test]
    fn test_drops_current_dir_segments() {
        let path = sandbox().resolve("./artists/./a.png").unwrap();
        assert_eq!(path, PathBuf::from("/nonexistent/cadenza-root/artists/a.png"));
    }

    #[test]
    fn test_rejects_parent_segments() {
        for key in [
            "..",
            "../etc/passwd",
            "artists/../../etc/passwd",
            "tracks/abc/../../../secret",
            "tracks/..",
        ] {
            assert!(
                matches!(sandbox().resolve(key), Err(StorageError::InvalidPath(_))),
                "expected rejection for {key}"
            );
        }
    }

    #[test]
    fn test_rejects_absolute_keys() {
        for key in ["/etc/passwd", "/nonexistent/cadenza-root/artists/a.png", "//x"] {
            assert!(matches!(
                sandbox().resolve(key),
                Err(StorageError::InvalidPath(_))
            ));
        }
    }

    #[test]
    fn test_rejects_root_and_empty_keys() {
        for key in ["", ".", "./", "././."] {
            assert!(matches!(
                sandbox().resolve(key),
                Err(StorageError::InvalidPath(_))
            ));
        }
    }

    #[test]
    fn test_rejects_backslashes_and_nul() {
        assert!(sandbox().resolve("artists\\..\\x").is_err());
        assert!(sandbox().resolve("artists/a\0.png").is_err());
    }

    #[test]
    fn test_allows_dots_inside_names() {
        assert!(sandbox().resolve("artists/a..b.png").is_ok());
    }

    #[test]
    fn test_error_message_does_not_echo_key() {
        let err = sandbox().resolve("../very-secret-name").unwrap_err();
        assert!(!err.to_string().contains("very-secret-name"));
    }
}
