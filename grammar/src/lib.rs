mod error;
mod help;
mod parser;
mod spec;

pub use error::GrammarError;
pub use help::{CliHelpSource, HelpSource, parse_help};
pub use parser::{Cursor, Options, ParsedOption, parse_options};
pub use spec::{OptionSpec, OptionType};
