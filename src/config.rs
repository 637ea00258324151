//! Command line configuration for the checker binary.

use std::path::PathBuf;

use thiserror::Error;

pub const USAGE: &str = "Usage: cscript-check [--dump-types] [--dump-metadata] <file.cs>...";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no input files")]
    NoInputs,
    #[error("unknown option {0:?}")]
    UnknownOption(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub inputs: Vec<PathBuf>,
    /// Print the merged type table.
    pub dump_types: bool,
    /// Print constants, unwrap scopes and allocation sites per unit.
    pub dump_metadata: bool,
}

impl Config {
    /// Builds a config from the arguments after the program name.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut config = Config::default();

        for arg in args.into_iter().map(Into::<String>::into) {
            match arg.as_str() {
                "--dump-types" => config.dump_types = true,
                "--dump-metadata" => config.dump_metadata = true,
                option if option.starts_with('-') => {
                    return Err(ConfigError::UnknownOption(option.to_string()));
                }
                _ => config.inputs.push(PathBuf::from(arg)),
            }
        }

        if config.inputs.is_empty() {
            return Err(ConfigError::NoInputs);
        }

        Ok(config)
    }
}
