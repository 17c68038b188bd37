use std::path::{Path, PathBuf};

/// Compose file names looked up when no `--file` is given, by priority.
pub const DEFAULT_FILES: &[&str] = &[
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yaml",
    "compose.yml",
];

/// The default compose file in `dir` followed by its override file, if any.
pub fn default_files(dir: &Path) -> Vec<PathBuf> {
    let Some(primary) = DEFAULT_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
    else {
        return Vec::new();
    };

    let mut files = vec![primary.clone()];
    if let Some(stem) = primary.file_stem().and_then(|s| s.to_str()) {
        let override_file = ["yml", "yaml"]
            .iter()
            .map(|ext| dir.join(format!("{}.override.{}", stem, ext)))
            .find(|path| path.is_file());
        files.extend(override_file);
    }
    files
}
