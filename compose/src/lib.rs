mod cleanup;
mod error;
mod files;
mod rewrite;

pub use cleanup::Cleanup;
pub use error::ComposeError;
pub use files::{DEFAULT_FILES, default_files};
pub use rewrite::{ComposeRewriter, RewrittenFile, rewrite_document};
