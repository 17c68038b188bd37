use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionType {
    pub is_valued: bool,
}

impl OptionType {
    pub const BOOLEAN: OptionType = OptionType { is_valued: false };
    pub const VALUED: OptionType = OptionType { is_valued: true };
}

/// Recognized options of one tool or subcommand, keyed without their dashes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub long_options: BTreeMap<String, OptionType>,
    pub short_options: BTreeMap<String, OptionType>,
}

impl OptionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_long(mut self, name: &str, option_type: OptionType) -> Self {
        self.long_options.insert(name.to_string(), option_type);
        self
    }

    pub fn with_short(mut self, name: char, option_type: OptionType) -> Self {
        self.short_options.insert(name.to_string(), option_type);
        self
    }

    pub fn long(&self, name: &str) -> Option<OptionType> {
        self.long_options.get(name).copied()
    }

    pub fn short(&self, name: char) -> Option<OptionType> {
        let mut buf = [0u8; 4];
        self.short_options.get(&*name.encode_utf8(&mut buf)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.long_options.is_empty() && self.short_options.is_empty()
    }

    /// Grammar used for `compose` when the wrapped tool cannot describe it.
    pub fn builtin_compose() -> Self {
        Self::new()
            .with_long("ansi", OptionType::VALUED)
            .with_long("env-file", OptionType::VALUED)
            .with_long("file", OptionType::VALUED)
            .with_long("profile", OptionType::VALUED)
            .with_long("project-name", OptionType::VALUED)
            .with_long("project-directory", OptionType::VALUED)
            .with_short('f', OptionType::VALUED)
            .with_short('p', OptionType::VALUED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_compose() {
        let spec = OptionSpec::builtin_compose();
        assert_eq!(spec.long("file"), Some(OptionType::VALUED));
        assert_eq!(spec.short('f'), Some(OptionType::VALUED));
        assert_eq!(spec.short('x'), None);
        assert!(!spec.is_empty());
    }
}
