use crate::command::Command;
use crate::compose::convert_compose_options;
use crate::error::TranslateError;
use crate::grammar::ToolGrammar;
use crate::run::convert_run_options;
use crate::settings::Settings;
use crate::temp_files::TempFiles;
use hostmap_grammar::{CliHelpSource, Cursor, GrammarError, HelpSource, Options, parse_options};
use hostmap_mount::{MountTable, PathVirtualizer};

/// Turns an argument vector meant for the wrapped CLI into one whose paths
/// are valid on the host.
pub struct Translator {
    settings: Settings,
    grammar: ToolGrammar,
    mounts: MountTable,
    temp_files: TempFiles,
}

impl Translator {
    /// Infers grammars and mounts through the CLI named in `settings`.
    pub fn new(settings: Settings) -> Self {
        let help = CliHelpSource::new(&settings.cli_path);
        let mounts = MountTable::from_cli(&settings.cli_path);
        Self::with_parts(settings, help, mounts)
    }

    pub fn with_parts(
        settings: Settings,
        help: impl HelpSource + Send + 'static,
        mounts: MountTable,
    ) -> Self {
        let grammar = ToolGrammar::new(help, settings.compose_fallback);
        Self {
            settings,
            grammar,
            mounts,
            temp_files: TempFiles::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn grammar(&mut self) -> &mut ToolGrammar {
        &mut self.grammar
    }

    pub fn mounts(&self) -> &MountTable {
        &self.mounts
    }

    /// A handle on the files this translator writes, usable from another
    /// thread to cancel a translation that is still running.
    pub fn temp_files(&self) -> TempFiles {
        self.temp_files.clone()
    }

    pub fn virtualizer(&self) -> Result<PathVirtualizer<'_>, TranslateError> {
        Ok(PathVirtualizer::new(&self.mounts, self.settings.working_dir()?))
    }

    /// Rewrites `args`; invocations that carry no paths come back unchanged.
    pub fn translate(&mut self, args: Vec<String>) -> Result<Command, TranslateError> {
        let mut cursor = Cursor::new(args);
        let global = parse_options(&mut cursor, self.grammar.spec(&[])?)?;

        let subcommand = cursor.next_arg().map(str::to_string);
        match subcommand.as_deref() {
            Some("container") => match cursor.next_arg().map(str::to_string).as_deref() {
                Some(arg) if arg.starts_with('-') => {
                    Err(GrammarError::UnrecognizedOption(arg.to_string()).into())
                }
                Some(sub @ ("run" | "create")) => {
                    self.translate_run(global, &["container", sub], cursor)
                }
                _ => Ok(self.pass_through(cursor)),
            },
            Some(sub @ ("run" | "create")) => self.translate_run(global, &[sub], cursor),
            Some("compose") => self.translate_compose(global, cursor),
            _ => Ok(self.pass_through(cursor)),
        }
    }

    fn pass_through(&self, cursor: Cursor) -> Command {
        tracing::debug!("Nothing to translate, forwarding arguments unchanged");
        Command::new(cursor.args().to_vec())
    }

    fn translate_run(
        &mut self,
        global: Options,
        subcommand: &[&str],
        mut cursor: Cursor,
    ) -> Result<Command, TranslateError> {
        let mut options = parse_options(&mut cursor, self.grammar.spec(subcommand)?)?;
        convert_run_options(&mut options, &self.virtualizer()?)?;

        let mut args = global.to_args();
        args.extend(subcommand.iter().map(|s| s.to_string()));
        args.extend(options.to_args());
        args.extend(cursor.remaining().iter().cloned());
        Ok(Command::new(args))
    }

    fn translate_compose(
        &mut self,
        global: Options,
        mut cursor: Cursor,
    ) -> Result<Command, TranslateError> {
        let Some(spec) = self.grammar.compose_spec()? else {
            tracing::debug!("compose is not supported by the CLI");
            return Ok(self.pass_through(cursor));
        };

        let options = parse_options(&mut cursor, spec)?;
        let virtualizer = self.virtualizer()?;
        let (options, cleanup) = convert_compose_options(
            options,
            &virtualizer,
            self.settings.temp_dir.clone(),
            &self.temp_files,
        )?;

        let mut args = global.to_args();
        args.push("compose".to_string());
        args.extend(options.to_args());
        args.extend(cursor.remaining().iter().cloned());
        Ok(Command::with_cleanup(args, cleanup))
    }
}
