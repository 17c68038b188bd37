mod command;
mod compose;
mod error;
mod grammar;
mod run;
mod settings;
mod temp_files;
mod translate;

pub use command::Command;
pub use compose::convert_compose_options;
pub use error::TranslateError;
pub use grammar::ToolGrammar;
pub use run::convert_run_options;
pub use settings::{DEFAULT_CLI_PATH, Settings};
pub use temp_files::TempFiles;
pub use translate::Translator;

pub use hostmap_compose::Cleanup;
