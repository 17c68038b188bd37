use crate::error::GrammarError;
use crate::spec::OptionSpec;

/// Position over an argument vector shared by successive grammars.
#[derive(Debug, Clone)]
pub struct Cursor {
    args: Vec<String>,
    index: usize,
}

impl Cursor {
    pub fn new(args: Vec<String>) -> Self {
        Self { args, index: 0 }
    }

    pub fn peek(&self) -> Option<&str> {
        self.args.get(self.index).map(String::as_str)
    }

    pub fn next_arg(&mut self) -> Option<&str> {
        let arg = self.args.get(self.index)?;
        self.index += 1;
        Some(arg.as_str())
    }

    /// Arguments not consumed yet.
    pub fn remaining(&self) -> &[String] {
        &self.args[self.index.min(self.args.len())..]
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn position(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOption {
    pub name: String,
    pub value: String,
}

impl ParsedOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn is(&self, names: &[&str]) -> bool {
        names.contains(&self.name.as_str())
    }

    pub fn to_arg(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Parsed options in command-line order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options(Vec<ParsedOption>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push(ParsedOption::new(name, value));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParsedOption> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ParsedOption> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders every option as a single `name=value` argument.
    pub fn to_args(&self) -> Vec<String> {
        self.0.iter().map(ParsedOption::to_arg).collect()
    }
}

impl IntoIterator for Options {
    type Item = ParsedOption;
    type IntoIter = std::vec::IntoIter<ParsedOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Options {
    type Item = &'a ParsedOption;
    type IntoIter = std::slice::Iter<'a, ParsedOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ParsedOption> for Options {
    fn from_iter<I: IntoIterator<Item = ParsedOption>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Consumes options from `cursor` until the first non-option argument.
///
/// The cursor is left on that argument (a subcommand, an image, `--`, ...)
/// so the caller can continue with the next grammar.
pub fn parse_options(cursor: &mut Cursor, spec: &OptionSpec) -> Result<Options, GrammarError> {
    let mut options = Options::new();

    while let Some(arg) = cursor.peek() {
        if arg == "-" || arg == "--" || !arg.starts_with('-') {
            break;
        }

        let arg = arg.to_string();
        cursor.index += 1;

        if let Some(body) = arg.strip_prefix("--") {
            parse_long(body, cursor, spec, &mut options)?;
        } else {
            parse_short(&arg[1..], cursor, spec, &mut options)?;
        }
    }

    Ok(options)
}

fn parse_long(
    body: &str,
    cursor: &mut Cursor,
    spec: &OptionSpec,
    options: &mut Options,
) -> Result<(), GrammarError> {
    let (name, inline) = split_value(body);
    let flag = format!("--{}", name);

    let option_type = spec
        .long(name)
        .ok_or_else(|| GrammarError::UnrecognizedOption(flag.clone()))?;

    let value = match inline {
        Some(value) => value.to_string(),
        None if !option_type.is_valued => "true".to_string(),
        None => take_value(cursor, &flag)?,
    };

    options.add(flag, value);
    Ok(())
}

fn parse_short(
    body: &str,
    cursor: &mut Cursor,
    spec: &OptionSpec,
    options: &mut Options,
) -> Result<(), GrammarError> {
    let (cluster, inline) = split_value(body);
    let chars: Vec<char> = cluster.chars().collect();

    if chars.is_empty() {
        return Err(GrammarError::UnrecognizedOption(format!("-{}", body)));
    }

    for (i, &c) in chars.iter().enumerate() {
        let flag = format!("-{}", c);
        let option_type = spec
            .short(c)
            .ok_or_else(|| GrammarError::UnrecognizedOption(flag.clone()))?;
        let last = i + 1 == chars.len();

        if !option_type.is_valued {
            let value = match inline {
                Some(value) if last => value.to_string(),
                _ => "true".to_string(),
            };
            options.add(flag, value);
            continue;
        }

        if last {
            let value = match inline {
                Some(value) => value.to_string(),
                None => take_value(cursor, &flag)?,
            };
            options.add(flag, value);
        } else if inline.is_some() {
            // -ab=x with a valued: `a` has nowhere to take its value from
            return Err(GrammarError::MissingOptionValue(flag));
        } else {
            // -p8080
            let attached: String = chars[i + 1..].iter().collect();
            options.add(flag, attached);
            break;
        }
    }

    Ok(())
}

fn split_value(body: &str) -> (&str, Option<&str>) {
    match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    }
}

fn take_value(cursor: &mut Cursor, flag: &str) -> Result<String, GrammarError> {
    cursor
        .next_arg()
        .map(str::to_string)
        .ok_or_else(|| GrammarError::MissingOptionValue(flag.to_string()))
}
