//! CLI command implementations.
//!
//! - [`build`] - Print the request built from an options object
//! - [`keys`] - List recognized option keys
//! - [`run`] - Run a session against the simulated engine

pub mod build;
pub mod common;
pub mod keys;
pub mod run;
