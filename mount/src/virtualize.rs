use crate::MountEntry;
use crate::error::MountError;
use crate::table::MountTable;
use std::path::{Component, Path, PathBuf};

/// Translates paths seen inside the container into paths on the host.
pub struct PathVirtualizer<'a> {
    table: &'a MountTable,
    base_dir: PathBuf,
}

impl<'a> PathVirtualizer<'a> {
    /// `base_dir` anchors relative paths; it should itself be absolute.
    pub fn new(table: &'a MountTable, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            table,
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the host path backing `path`.
    ///
    /// When several mounts contain the path, the one with the deepest
    /// destination wins regardless of the order inspection listed them in;
    /// among equally deep destinations the earlier entry wins.
    pub fn to_host_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, MountError> {
        let target = normalize(path.as_ref(), &self.base_dir);
        let entries = self.table.resolve()?;

        let mut best: Option<(&MountEntry, PathBuf, usize)> = None;
        for entry in entries {
            // tmpfs and similar records have no host source
            if !Path::new(&entry.source).is_absolute() {
                continue;
            }
            let destination = normalize(Path::new(&entry.destination), Path::new("/"));
            let Ok(relative) = target.strip_prefix(&destination) else {
                continue;
            };

            let depth = relative.components().count();
            if best.as_ref().is_none_or(|(_, _, d)| depth < *d) {
                best = Some((entry, relative.to_path_buf(), depth));
            }
        }

        let Some((entry, relative, _)) = best else {
            return Err(MountError::PathNotHostBacked(target));
        };

        let source = Path::new(&entry.source);
        let host_path = if relative.as_os_str().is_empty() {
            source.to_path_buf()
        } else {
            source.join(relative)
        };

        tracing::debug!(
            path = ?target,
            host_path = ?host_path,
            destination = %entry.destination,
            "Translated container path"
        );
        Ok(host_path)
    }
}

/// Lexically resolves `.` and `..` in `path`, anchoring it at `base` if it
/// is relative. Symlinks are not followed.
pub fn normalize(path: &Path, base: &Path) -> PathBuf {
    let joined;
    let path = if path.is_absolute() {
        path
    } else {
        joined = base.join(path);
        joined.as_path()
    };

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
