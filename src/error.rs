// SPDX-License-Identifier: MIT

use thiserror::Error;
use weft_term::ConfigError;

/// Everything that can stop a `weft` command.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input argument contained an escape we do not understand.
    #[error("bad escape at byte {offset} of {input:?}: {reason}")]
    BadEscape {
        input: String,
        offset: usize,
        reason: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
