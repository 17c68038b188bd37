use crate::error::TranslateError;
use hostmap_compose::{Cleanup, ComposeError, RewrittenFile};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct State {
    cleanup: Cleanup,
    cancelled: bool,
    handed_over: bool,
}

/// Temporary files created by an in-flight translation.
///
/// Clones share the same files, so another thread can abandon a translation
/// with [`TempFiles::cancel`] and still remove whatever it already wrote.
#[derive(Clone, Debug, Default)]
pub struct TempFiles {
    state: Arc<Mutex<State>>,
}

impl TempFiles {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `create` and registers the file it produces.
    ///
    /// The lock is held while `create` runs, so a concurrent `cancel` either
    /// sees the file or prevents it from being created at all.
    pub fn track<F>(&self, create: F) -> Result<PathBuf, TranslateError>
    where
        F: FnOnce() -> Result<RewrittenFile, ComposeError>,
    {
        let mut state = self.lock();
        if state.cancelled {
            return Err(TranslateError::Cancelled);
        }

        let file = create()?;
        let path = file.path().to_path_buf();
        state.cleanup.push(file.into_temp_path());
        Ok(path)
    }

    /// Hands the registered files over to the caller.
    ///
    /// After this a [`TempFiles::cancel`] no longer takes effect.
    pub fn take(&self) -> Cleanup {
        let mut state = self.lock();
        state.handed_over = true;
        std::mem::take(&mut state.cleanup)
    }

    /// Removes every registered file and refuses any further ones.
    ///
    /// Returns `false` if the files were already handed over; the
    /// translation has then finished writing and its result owns them.
    pub fn cancel(&self) -> bool {
        let cleanup = {
            let mut state = self.lock();
            if state.handed_over {
                return false;
            }
            state.cancelled = true;
            std::mem::take(&mut state.cleanup)
        };
        if !cleanup.is_empty() {
            tracing::info!(files = cleanup.len(), "Translation cancelled, removing temporary files");
        }
        cleanup.release();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostmap_compose::ComposeRewriter;
    use hostmap_mount::{MountTable, PathVirtualizer};
    use serde_yaml::Value;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> impl Fn() -> Result<RewrittenFile, ComposeError> + '_ {
        move || {
            let table = MountTable::from_entries("abc", Vec::new());
            let virtualizer = PathVirtualizer::new(&table, "/");
            ComposeRewriter::new(&virtualizer, Some(temp.path().to_path_buf()))
                .store(Path::new("compose.yml"), &Value::Null)
        }
    }

    #[test]
    fn test_take_hands_over_files() {
        let temp = TempDir::new().unwrap();
        let files = TempFiles::new();

        let path = files.track(store(&temp)).unwrap();
        assert!(path.exists());

        let cleanup = files.take();
        assert_eq!(cleanup.len(), 1);
        assert!(files.take().is_empty());

        cleanup.release();
        assert!(!path.exists());
    }

    #[test]
    fn test_cancel_removes_tracked_files() {
        let temp = TempDir::new().unwrap();
        let files = TempFiles::new();
        let handle = files.clone();

        let first = files.track(store(&temp)).unwrap();
        let second = files.track(store(&temp)).unwrap();

        assert!(handle.cancel());
        assert!(files.is_cancelled());
        assert!(!first.exists());
        assert!(!second.exists());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_no_files_created_after_cancel() {
        let temp = TempDir::new().unwrap();
        let files = TempFiles::new();
        assert!(files.cancel());

        let err = files.track(store(&temp)).unwrap_err();
        assert!(matches!(err, TranslateError::Cancelled));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_cancel_after_hand_over_is_refused() {
        let temp = TempDir::new().unwrap();
        let files = TempFiles::new();

        let path = files.track(store(&temp)).unwrap();
        let cleanup = files.take();

        assert!(!files.cancel());
        assert!(!files.is_cancelled());
        assert!(path.exists());

        cleanup.release();
        assert!(!path.exists());
    }
}
