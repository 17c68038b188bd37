use crate::MountEntry;
use crate::error::MountError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Query interface of the container management system.
pub trait Inspector {
    fn mounts(&self, container_id: &str) -> Result<Vec<MountEntry>, MountError>;
}

#[derive(Debug, Deserialize)]
struct InspectRecord {
    #[serde(rename = "Mounts", default)]
    mounts: Vec<MountEntry>,
}

/// Runs `<cli> container inspect <id>` and reads the `Mounts` of the record.
#[derive(Debug, Clone)]
pub struct CliInspector {
    cli_path: PathBuf,
}

impl CliInspector {
    pub fn new(cli_path: impl AsRef<Path>) -> Self {
        Self {
            cli_path: cli_path.as_ref().to_path_buf(),
        }
    }
}

impl Inspector for CliInspector {
    fn mounts(&self, container_id: &str) -> Result<Vec<MountEntry>, MountError> {
        let output = Command::new(&self.cli_path)
            .args(["container", "inspect", container_id])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                MountError::InspectionFailure(format!(
                    "failed to run {}: {}",
                    self.cli_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(MountError::InspectionFailure(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        parse_inspect(&output.stdout, container_id)
    }
}

fn parse_inspect(stdout: &[u8], container_id: &str) -> Result<Vec<MountEntry>, MountError> {
    let records: Vec<InspectRecord> = serde_json::from_slice(stdout).map_err(|e| {
        MountError::InspectionFailure(format!("invalid inspect output: {}", e))
    })?;

    records
        .into_iter()
        .next()
        .map(|record| record.mounts)
        .ok_or_else(|| MountError::InspectionFailure(format!("no such container: {}", container_id)))
}
