use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("failed to run help for `{command}`: {message}")]
    Execution { command: String, message: String },

    #[error("unknown option: {0}")]
    UnrecognizedOption(String),

    #[error("option needs a value: {0}")]
    MissingOptionValue(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
