use hostmap_grammar::{GrammarError, HelpSource, OptionSpec};
use std::collections::HashMap;

/// Option grammars of the wrapped CLI, inferred on first use per subcommand.
pub struct ToolGrammar {
    source: Box<dyn HelpSource + Send>,
    specs: HashMap<Vec<String>, OptionSpec>,
    compose_supported: Option<bool>,
    compose_fallback: bool,
}

impl ToolGrammar {
    pub fn new(source: impl HelpSource + Send + 'static, compose_fallback: bool) -> Self {
        Self {
            source: Box::new(source),
            specs: HashMap::new(),
            compose_supported: None,
            compose_fallback,
        }
    }

    /// Grammar of `subcommand`; an empty slice is the top-level grammar.
    pub fn spec(&mut self, subcommand: &[&str]) -> Result<&OptionSpec, GrammarError> {
        let key: Vec<String> = subcommand.iter().map(|s| s.to_string()).collect();
        if !self.specs.contains_key(&key) {
            let spec = self.source.option_spec(subcommand)?;
            self.specs.insert(key.clone(), spec);
        }
        Ok(&self.specs[&key])
    }

    /// Grammar of `compose`, or `None` when the CLI cannot run compose.
    pub fn compose_spec(&mut self) -> Result<Option<&OptionSpec>, GrammarError> {
        let supported = match self.compose_supported {
            Some(supported) => supported,
            None => {
                let supported = self.source.supports_subcommand(&["compose"])?;
                tracing::debug!(supported, "Checked compose support");
                self.compose_supported = Some(supported);
                supported
            }
        };

        if supported {
            return self.spec(&["compose"]).map(Some);
        }

        if self.compose_fallback {
            let key = vec!["compose".to_string()];
            let spec = self
                .specs
                .entry(key)
                .or_insert_with(OptionSpec::builtin_compose);
            return Ok(Some(&*spec));
        }

        Ok(None)
    }
}
