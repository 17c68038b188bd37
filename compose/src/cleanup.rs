use std::path::PathBuf;
use tempfile::TempPath;

/// Temporary files that must outlive the forwarded command.
///
/// Files are removed by [`Cleanup::release`], or when the value is dropped
/// on any other path, so removal happens exactly once.
#[derive(Debug, Default)]
pub struct Cleanup {
    paths: Vec<TempPath>,
}

impl Cleanup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: TempPath) {
        self.paths.push(path);
    }

    pub fn extend(&mut self, other: Cleanup) {
        self.paths.extend(other.paths);
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &std::path::Path> {
        self.paths.iter().map(|p| &**p)
    }

    /// Removes every file now, logging the ones that could not be removed.
    pub fn release(self) {
        for path in self.paths {
            let shown = path.display().to_string();
            match path.close() {
                Ok(()) => tracing::debug!(path = %shown, "Removed temporary file"),
                Err(e) => tracing::warn!(path = %shown, "Failed to remove temporary file: {}", e),
            }
        }
    }

    /// Disarms the cleanup and hands the files over to the caller.
    pub fn keep(self) -> std::io::Result<Vec<PathBuf>> {
        self.paths
            .into_iter()
            .map(|p| p.keep().map_err(|e| e.error))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    fn temp_path(dir: &TempDir) -> TempPath {
        NamedTempFile::new_in(dir.path()).unwrap().into_temp_path()
    }

    #[test]
    fn test_release_removes_files() {
        let dir = TempDir::new().unwrap();
        let mut cleanup = Cleanup::new();
        cleanup.push(temp_path(&dir));
        cleanup.push(temp_path(&dir));

        let paths: Vec<PathBuf> = cleanup.paths().map(|p| p.to_path_buf()).collect();
        assert!(paths.iter().all(|p| p.exists()));

        cleanup.release();
        assert!(paths.iter().all(|p| !p.exists()));
    }

    #[test]
    fn test_drop_removes_files() {
        let dir = TempDir::new().unwrap();
        let path = {
            let mut cleanup = Cleanup::new();
            cleanup.push(temp_path(&dir));
            cleanup.paths().next().unwrap().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_keep_disarms() {
        let dir = TempDir::new().unwrap();
        let mut cleanup = Cleanup::new();
        cleanup.push(temp_path(&dir));

        let kept = cleanup.keep().unwrap();
        assert_eq!(kept.len(), 1);
        assert!(kept[0].exists());
    }
}
