use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MountError {
    #[error("failed to get container id: not running inside a container")]
    ContainerIdentityUnavailable,

    #[error("container inspection failed: {0}")]
    InspectionFailure(String),

    #[error("path is not in host filesystem: {}", .0.display())]
    PathNotHostBacked(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
