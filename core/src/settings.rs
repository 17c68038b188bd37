use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CLI_PATH: &str = "/usr/bin/docker";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The wrapped container CLI.
    pub cli_path: PathBuf,
    /// Use a built-in `compose` grammar when the CLI has no `compose` subcommand.
    pub compose_fallback: bool,
    /// Where rewritten compose files are written; the system temp dir if unset.
    pub temp_dir: Option<PathBuf>,
    /// Base of relative paths; the process working directory if unset.
    pub working_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cli_path: PathBuf::from(DEFAULT_CLI_PATH),
            compose_fallback: false,
            temp_dir: None,
            working_dir: None,
        }
    }
}

impl Settings {
    pub fn working_dir(&self) -> std::io::Result<PathBuf> {
        match &self.working_dir {
            Some(dir) if dir.is_absolute() => Ok(dir.clone()),
            Some(dir) => Ok(std::env::current_dir()?.join(dir)),
            None => std::env::current_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"compose_fallback": true}"#).unwrap();
        assert_eq!(settings.cli_path, PathBuf::from(DEFAULT_CLI_PATH));
        assert!(settings.compose_fallback);
        assert_eq!(settings.temp_dir, None);
    }

    #[test]
    fn test_absolute_working_dir() {
        let settings = Settings {
            working_dir: Some(PathBuf::from("/workspaces/app")),
            ..Default::default()
        };
        assert_eq!(settings.working_dir().unwrap(), PathBuf::from("/workspaces/app"));
    }
}
