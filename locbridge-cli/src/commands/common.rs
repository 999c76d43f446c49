//! Helpers shared by several commands.

use std::path::Path;

use locbridge::config::ConfigFile;
use serde_json::Value;

use crate::error::CliError;

/// Parse the `--options` argument. Absent means no option bag at all.
pub fn parse_options(raw: Option<&str>) -> Result<Option<Value>, CliError> {
    raw.map(|text| serde_json::from_str(text).map_err(CliError::InvalidOptions))
        .transpose()
}

/// Load the config file from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}
