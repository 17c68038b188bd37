//! Option grammar inference from a tool's `--help` output.
//!
//! Help text layouts drift between tool versions, so scanning is best-effort:
//! lines that do not look like option descriptions are skipped instead of
//! failing the whole grammar.

use crate::error::GrammarError;
use crate::spec::{OptionSpec, OptionType};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const SECTION_HEADERS: &[&str] = &["Options:", "Global Options:", "Flags:", "Global Flags:"];

/// Something that can print the help text of a tool and its subcommands.
pub trait HelpSource {
    fn help_text(&self, subcommand: &[&str]) -> Result<String, GrammarError>;

    /// Whether invoking the bare subcommand succeeds.
    fn supports_subcommand(&self, subcommand: &[&str]) -> Result<bool, GrammarError>;

    fn option_spec(&self, subcommand: &[&str]) -> Result<OptionSpec, GrammarError> {
        let text = self.help_text(subcommand)?;
        let spec = parse_help(&text);
        tracing::debug!(
            subcommand = ?subcommand,
            long = spec.long_options.len(),
            short = spec.short_options.len(),
            "Inferred option grammar"
        );
        Ok(spec)
    }
}

/// Runs the wrapped tool itself to obtain help text.
#[derive(Debug, Clone)]
pub struct CliHelpSource {
    cli_path: PathBuf,
}

impl CliHelpSource {
    pub fn new(cli_path: impl AsRef<Path>) -> Self {
        Self {
            cli_path: cli_path.as_ref().to_path_buf(),
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut command = self.cli_path.display().to_string();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }
}

impl HelpSource for CliHelpSource {
    fn help_text(&self, subcommand: &[&str]) -> Result<String, GrammarError> {
        let mut args = subcommand.to_vec();
        args.push("--help");

        let output = Command::new(&self.cli_path)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| GrammarError::Execution {
                command: self.describe(&args),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(GrammarError::Execution {
                command: self.describe(&args),
                message: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn supports_subcommand(&self, subcommand: &[&str]) -> Result<bool, GrammarError> {
        let status = Command::new(&self.cli_path)
            .args(subcommand)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| GrammarError::Execution {
                command: self.describe(subcommand),
                message: e.to_string(),
            })?;

        Ok(status.success())
    }
}

/// Builds an [`OptionSpec`] from the options sections of `text`.
pub fn parse_help(text: &str) -> OptionSpec {
    let mut spec = OptionSpec::new();
    let mut in_section = false;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if !line.starts_with(char::is_whitespace) {
            in_section = SECTION_HEADERS.iter().any(|h| line.starts_with(h));
            continue;
        }

        if !in_section {
            continue;
        }

        let Some(scanned) = LineScanner::scan(line) else {
            continue;
        };

        let option_type = if scanned.valued {
            OptionType::VALUED
        } else {
            OptionType::BOOLEAN
        };

        for name in scanned.names {
            if let Some(long) = name.strip_prefix("--") {
                if is_option_name(long) {
                    spec.long_options.insert(long.to_string(), option_type);
                }
            } else if let Some(short) = name.strip_prefix('-') {
                if is_option_name(short) {
                    spec.short_options.insert(short.to_string(), option_type);
                }
            }
        }
    }

    spec
}

fn is_option_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Name,
    AliasSeparator,
    AfterName,
    Placeholder,
    Description,
}

#[derive(Debug, Default)]
struct ScannedLine {
    names: Vec<String>,
    valued: bool,
}

struct LineScanner {
    state: State,
    line: ScannedLine,
}

impl LineScanner {
    fn scan(text: &str) -> Option<ScannedLine> {
        let mut scanner = LineScanner {
            state: State::Idle,
            line: ScannedLine::default(),
        };

        for c in text.chars() {
            scanner.feed(c);
            if scanner.state == State::Description {
                break;
            }
        }

        if scanner.line.names.is_empty() {
            None
        } else {
            Some(scanner.line)
        }
    }

    fn start_name(&mut self, c: char) {
        self.line.names.push(c.to_string());
        self.state = State::Name;
    }

    fn feed(&mut self, c: char) {
        let state = self.state;
        self.state = match state {
            State::Idle => match c {
                '-' => {
                    self.start_name(c);
                    State::Name
                }
                c if c.is_whitespace() => State::Idle,
                _ => State::Description,
            },
            State::Name => match c {
                ',' => State::AliasSeparator,
                // --file=FILE
                '=' => {
                    self.line.valued = true;
                    State::Placeholder
                }
                c if c.is_whitespace() => State::AfterName,
                c => {
                    if let Some(name) = self.line.names.last_mut() {
                        name.push(c);
                    }
                    State::Name
                }
            },
            State::AliasSeparator => match c {
                '-' => {
                    self.start_name(c);
                    State::Name
                }
                c if c.is_whitespace() => State::AliasSeparator,
                _ => State::Description,
            },
            State::AfterName => match c {
                '-' => {
                    self.start_name(c);
                    State::Name
                }
                c if c.is_whitespace() => State::Description,
                _ => {
                    self.line.valued = true;
                    State::Placeholder
                }
            },
            State::Placeholder => match c {
                c if c.is_whitespace() => State::Description,
                _ => State::Placeholder,
            },
            State::Description => State::Description,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN_HELP: &str = "
Usage:  docker run [OPTIONS] IMAGE [COMMAND] [ARG...]

Create and run a new container from an image

Aliases:
  docker container run, docker run

Options:
      --add-host list                    Add a custom host-to-IP mapping
  -a, --attach list                      Attach to STDIN, STDOUT or STDERR
  -d, --detach                           Run container in background and
                                         print container ID

  -i, --interactive                      Keep STDIN open even if not attached
      --mount mount                      Attach a filesystem mount to the
                                         container
      --rm                               Automatically remove the container
  -t, --tty                              Allocate a pseudo-TTY
  -v, --volume list                      Bind mount a volume
  -w, --workdir string                   Working directory inside the container
Run 'docker run --help' for more information
  -z, --zzz                              Not an option, outside the section
";

    #[test]
    fn test_parse_run_help() {
        let spec = parse_help(RUN_HELP);

        assert_eq!(spec.long("add-host"), Some(OptionType::VALUED));
        assert_eq!(spec.long("attach"), Some(OptionType::VALUED));
        assert_eq!(spec.short('a'), Some(OptionType::VALUED));
        assert_eq!(spec.long("detach"), Some(OptionType::BOOLEAN));
        assert_eq!(spec.short('d'), Some(OptionType::BOOLEAN));
        assert_eq!(spec.long("rm"), Some(OptionType::BOOLEAN));
        assert_eq!(spec.long("volume"), Some(OptionType::VALUED));
        assert_eq!(spec.short('v'), Some(OptionType::VALUED));
        assert_eq!(spec.short('w'), Some(OptionType::VALUED));
        assert_eq!(spec.long("mount"), Some(OptionType::VALUED));
    }

    #[test]
    fn test_section_ends_on_unindented_line() {
        let spec = parse_help(RUN_HELP);
        assert_eq!(spec.short('z'), None);
        assert_eq!(spec.long("zzz"), None);
    }

    #[test]
    fn test_aliases_share_booleanness() {
        let spec = parse_help("Options:\n  -f, --file FILE   Compose file\n  -q, --quiet   Quiet\n");
        assert_eq!(spec.short('f'), spec.long("file"));
        assert_eq!(spec.short('f'), Some(OptionType::VALUED));
        assert_eq!(spec.short('q'), spec.long("quiet"));
        assert_eq!(spec.short('q'), Some(OptionType::BOOLEAN));
    }

    #[test]
    fn test_global_options_header_and_gnu_style() {
        let text = "Usage: tool [OPTIONS]\n\nGlobal Options:\n      --config=DIR   Location of configs\n  -D, --debug        Debug mode\n\nCommands:\n  run   Run\n";
        let spec = parse_help(text);
        assert_eq!(spec.long("config"), Some(OptionType::VALUED));
        assert_eq!(spec.long("debug"), Some(OptionType::BOOLEAN));
        assert_eq!(spec.long("run"), None);
    }

    #[test]
    fn test_space_separated_aliases() {
        let spec = parse_help("Options:\n  -H --host list   Daemon socket\n");
        assert_eq!(spec.short('H'), Some(OptionType::VALUED));
        assert_eq!(spec.long("host"), Some(OptionType::VALUED));
    }

    #[test]
    fn test_unparseable_lines_are_skipped() {
        let text = "Options:\n      this line is prose\n  -- \n      --ok   Fine\n";
        let spec = parse_help(text);
        assert_eq!(spec.long_options.len(), 1);
        assert_eq!(spec.long("ok"), Some(OptionType::BOOLEAN));
        assert!(spec.short_options.is_empty());
    }

    #[test]
    fn test_no_section() {
        assert!(parse_help("Usage: tool\n  -x   ignored\n").is_empty());
    }

    #[test]
    fn test_missing_cli_is_execution_error() {
        let source = CliHelpSource::new("/nonexistent/hostmap-test-cli");
        let err = source.help_text(&["run"]).unwrap_err();
        assert!(matches!(err, GrammarError::Execution { .. }));
    }
}
