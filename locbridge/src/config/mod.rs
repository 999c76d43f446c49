//! Configuration for the location module.
//!
//! - [`ModuleConfig`] - runtime settings passed to `LocationModule`
//! - [`ConfigFile`] - INI file loader (`~/.locbridge/config.ini`)

mod file;
mod module;

pub use file::{config_file_path, ConfigFile, ConfigFileError, LoggingSettings};
pub use module::ModuleConfig;
