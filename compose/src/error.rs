use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("mount error: {0}")]
    Mount(#[from] hostmap_mount::MountError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
