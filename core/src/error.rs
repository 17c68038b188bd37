use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error(transparent)]
    Grammar(#[from] hostmap_grammar::GrammarError),

    #[error("mount error: {0}")]
    Mount(#[from] hostmap_mount::MountError),

    #[error("compose error: {0}")]
    Compose(#[from] hostmap_compose::ComposeError),

    #[error("translation cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
