//! # Bookwaves Configuration
//!
//! Loading and validation of the YAML service configuration: the RFID
//! readers to drive, the tag password map handed to
//! [`bookwaves_tag::PasswordStore`], and global service switches.
//!
//! Loading is strict where tag decoding is lenient: a service without
//! readers or with an unreadable file must not start, so these paths return
//! [`ConfigError`] instead of degrading.

use std::path::PathBuf;

use thiserror::Error;

pub mod reader;
pub mod settings;

pub use reader::ReaderConfig;
pub use settings::{Configuration, CONFIG_PATH_ENV};

/// Errors from loading the service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment variable naming the file is unset or empty.
    #[error("CONFIG_FILE_PATH environment variable is not set, provide the configuration file path")]
    MissingEnv,

    /// The file could not be opened.
    #[error("cannot open configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for the configuration schema.
    #[error("cannot parse configuration file")]
    Parse(#[from] serde_yaml::Error),

    /// The file defines no readers.
    #[error("no readers found in configuration")]
    NoReaders,
}
