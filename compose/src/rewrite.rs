//! Bind-mount source rewriting for compose documents.
//!
//! Documents the rewriter does not understand are passed through untouched;
//! a bind source with no host counterpart fails the whole document.

use crate::error::ComposeError;
use hostmap_mount::PathVirtualizer;
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

const TEMP_PREFIX: &str = "docker-compose-";
const TEMP_SUFFIX: &str = ".yml";

/// Top-level `volumes:` of a document.
enum NamedVolumes {
    Absent,
    Declared(HashSet<String>),
    Malformed,
}

impl NamedVolumes {
    fn from_document(document: &Value) -> Self {
        match document.get("volumes") {
            None | Some(Value::Null) => NamedVolumes::Absent,
            Some(Value::Mapping(volumes)) => NamedVolumes::Declared(
                volumes
                    .keys()
                    .filter_map(|k| k.as_str().map(str::to_string))
                    .collect(),
            ),
            Some(_) => NamedVolumes::Malformed,
        }
    }

    /// Whether a short-form source must be left alone.
    fn shadows(&self, source: &str) -> bool {
        match self {
            NamedVolumes::Absent => false,
            NamedVolumes::Declared(names) => names.contains(source),
            NamedVolumes::Malformed => true,
        }
    }
}

struct Context<'a, 'b> {
    project_dir: &'a Path,
    virtualizer: &'a PathVirtualizer<'b>,
    named: NamedVolumes,
}

impl Context<'_, '_> {
    fn host_source(&self, source: &str) -> Result<String, ComposeError> {
        let path = Path::new(source);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        };

        let host_path = self.virtualizer.to_host_path(&path)?;
        tracing::info!(source = %source, host_path = ?host_path, "Rewriting bind source");
        Ok(host_path.to_string_lossy().into_owned())
    }

    fn rewrite_short(&self, spec: &mut String) -> Result<(), ComposeError> {
        let mut parts: Vec<&str> = spec.split(':').collect();

        // a lone container path declares an anonymous volume
        if parts.len() < 2 {
            return Ok(());
        }

        if self.named.shadows(parts[0]) {
            tracing::debug!(volume = %parts[0], "Skipping named volume");
            return Ok(());
        }

        let host_source = self.host_source(parts[0])?;
        parts[0] = &host_source;
        *spec = parts.join(":");
        Ok(())
    }

    fn rewrite_long(&self, volume: &mut Mapping) -> Result<(), ComposeError> {
        if volume.get("type").and_then(Value::as_str) != Some("bind") {
            return Ok(());
        }

        match volume.get_mut("source") {
            Some(Value::String(source)) => {
                *source = self.host_source(source)?;
            }
            _ => tracing::warn!("Bind volume without a source, leaving it as is"),
        }
        Ok(())
    }

    fn rewrite_service(&self, name: &Value, service: &mut Value) -> Result<(), ComposeError> {
        let Some(volumes) = service.get_mut("volumes").and_then(Value::as_sequence_mut) else {
            return Ok(());
        };

        tracing::debug!(service = ?name.as_str(), volumes = volumes.len(), "Visiting service");
        for volume in volumes.iter_mut() {
            match volume {
                Value::String(spec) => self.rewrite_short(spec)?,
                Value::Mapping(mapping) => self.rewrite_long(mapping)?,
                _ => {}
            }
        }
        Ok(())
    }
}

/// Rewrites bind sources of `document` in place.
///
/// Returns `Ok(false)` when the document has no `services` mapping, in which
/// case it is left untouched. On error the document may be partially
/// rewritten and must be discarded.
pub fn rewrite_document(
    document: &mut Value,
    project_dir: &Path,
    virtualizer: &PathVirtualizer<'_>,
) -> Result<bool, ComposeError> {
    let context = Context {
        project_dir,
        virtualizer,
        named: NamedVolumes::from_document(document),
    };

    let Some(services) = document.get_mut("services").and_then(Value::as_mapping_mut) else {
        return Ok(false);
    };

    for (name, service) in services.iter_mut() {
        context.rewrite_service(name, service)?;
    }
    Ok(true)
}

/// A rewritten compose file, deleted when dropped.
#[derive(Debug)]
pub struct RewrittenFile {
    original: PathBuf,
    path: TempPath,
}

impl RewrittenFile {
    pub fn original(&self) -> &Path {
        &self.original
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_temp_path(self) -> TempPath {
        self.path
    }
}

pub struct ComposeRewriter<'a, 'b> {
    virtualizer: &'a PathVirtualizer<'b>,
    temp_dir: PathBuf,
}

impl<'a, 'b> ComposeRewriter<'a, 'b> {
    pub fn new(virtualizer: &'a PathVirtualizer<'b>, temp_dir: Option<PathBuf>) -> Self {
        Self {
            virtualizer,
            temp_dir: temp_dir.unwrap_or_else(std::env::temp_dir),
        }
    }

    /// Parses and rewrites one document; `None` means pass it through.
    pub fn rewrite_bytes(
        &self,
        bytes: &[u8],
        project_dir: &Path,
    ) -> Result<Option<Value>, ComposeError> {
        let mut document: Value = match serde_yaml::from_slice(bytes) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Not a compose document, passing through: {}", e);
                return Ok(None);
            }
        };
        document.apply_merge()?;

        if !rewrite_document(&mut document, project_dir, self.virtualizer)? {
            tracing::warn!("No services in compose document, passing through");
            return Ok(None);
        }

        Ok(Some(document))
    }

    /// Writes a rewritten copy of `file` to a temporary file.
    ///
    /// Returns `None` when the file cannot be read or understood; the caller
    /// then uses the original path. The original file is never modified.
    pub fn rewrite_file(
        &self,
        file: &Path,
        project_dir: &Path,
    ) -> Result<Option<RewrittenFile>, ComposeError> {
        match self.load(file, project_dir)? {
            Some(document) => self.store(file, &document).map(Some),
            None => Ok(None),
        }
    }

    /// Reads and rewrites `file` without touching the filesystem otherwise.
    pub fn load(&self, file: &Path, project_dir: &Path) -> Result<Option<Value>, ComposeError> {
        let bytes = match std::fs::read(file) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(file = ?file, "Cannot read compose file, passing through: {}", e);
                return Ok(None);
            }
        };

        self.rewrite_bytes(&bytes, project_dir)
    }

    /// Serializes a document produced by [`Self::load`] into a new temporary
    /// file standing in for `file`.
    pub fn store(&self, file: &Path, document: &Value) -> Result<RewrittenFile, ComposeError> {
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.temp_dir)?;
        serde_yaml::to_writer(&mut temp, document)?;

        let path = temp.into_temp_path();
        tracing::info!(file = ?file, rewritten = ?&*path, "Wrote rewritten compose file");

        Ok(RewrittenFile {
            original: file.to_path_buf(),
            path,
        })
    }
}
