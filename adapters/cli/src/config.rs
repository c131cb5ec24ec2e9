//! Rules loading from optional TOML files.

use lane_defence_core::{Rules, RulesError};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Failures raised while turning a rules file into validated [`Rules`].
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read rules file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse rules file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("rules in {} describe an unplayable field", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: RulesError,
    },
}

/// Loads the rules, falling back to the defaults when no file is given.
pub(crate) fn load(path: Option<&Path>) -> Result<Rules, ConfigError> {
    let Some(path) = path else {
        return Ok(Rules::default());
    };

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}

fn parse(text: &str, path: &Path) -> Result<Rules, ConfigError> {
    let rules: Rules = toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    rules.validate().map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(rules)
}
