//! Detection of the container this process runs in.

use crate::error::MountError;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static MOUNTINFO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"/docker/([\w+\-.]{64}) ").expect("valid mountinfo pattern"),
        Regex::new(r"/docker/containers/([\w+\-.]{64})/").expect("valid mountinfo pattern"),
    ]
});

static CGROUP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"/docker/([0-9a-f]{64})").expect("valid cgroup pattern"),
        Regex::new(r"docker-([0-9a-f]{64})\.scope").expect("valid cgroup pattern"),
    ]
});

/// Source of the current container identity.
pub trait ContainerProbe {
    /// Returns `Ok(None)` when this probe finds no container.
    fn container_id(&self) -> Result<Option<String>, MountError>;
}

/// Scans a text file line by line for the first line matching a pattern.
#[derive(Debug, Clone)]
pub struct FileProbe {
    path: PathBuf,
    patterns: Vec<Regex>,
}

impl FileProbe {
    pub fn new(path: impl AsRef<Path>, patterns: Vec<Regex>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            patterns,
        }
    }

    pub fn mountinfo() -> Self {
        Self::new("/proc/self/mountinfo", MOUNTINFO_PATTERNS.clone())
    }

    pub fn cgroup() -> Self {
        Self::new("/proc/self/cgroup", CGROUP_PATTERNS.clone())
    }

    fn scan(&self, content: &str) -> Option<String> {
        content.lines().find_map(|line| {
            self.patterns
                .iter()
                .find_map(|pattern| pattern.captures(line))
                .and_then(|captures| captures.get(1))
                .map(|m| m.as_str().to_string())
        })
    }
}

impl ContainerProbe for FileProbe {
    fn container_id(&self) -> Result<Option<String>, MountError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "Probe source does not exist");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(self.scan(&content))
    }
}

/// Tries each probe in turn; the first identity found wins.
pub struct ChainProbe {
    probes: Vec<Box<dyn ContainerProbe + Send>>,
}

impl ChainProbe {
    pub fn new(probes: Vec<Box<dyn ContainerProbe + Send>>) -> Self {
        Self { probes }
    }
}

impl Default for ChainProbe {
    fn default() -> Self {
        Self::new(vec![
            Box::new(FileProbe::mountinfo()),
            Box::new(FileProbe::cgroup()),
        ])
    }
}

impl ContainerProbe for ChainProbe {
    fn container_id(&self) -> Result<Option<String>, MountError> {
        for probe in &self.probes {
            if let Some(id) = probe.container_id()? {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }
}

/// A fixed identity, for callers that already know it.
#[derive(Debug, Clone)]
pub struct StaticProbe(pub Option<String>);

impl ContainerProbe for StaticProbe {
    fn container_id(&self) -> Result<Option<String>, MountError> {
        Ok(self.0.clone())
    }
}
