//! The externally observable error taxonomy.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure a [`Processor`](crate::Processor) run can surface.
///
/// Recoverable input problems (unknown operators, malformed numbers) are
/// logged and never reach this type.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or inconsistent options, or an unknown output device.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An input path does not resolve to a readable file.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// An input file exists but could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The scanner hit an unrecoverable condition, such as a string left
    /// open at the end of the input.
    #[error("{}:{line}: {source}", .path.display())]
    Tokenize {
        path: PathBuf,
        line: u32,
        #[source]
        source: prepress_postscript::Error,
    },

    /// The interpreter failed on a recognized operator.
    #[error("{}: {source}", .path.display())]
    Interpret {
        path: PathBuf,
        #[source]
        source: prepress_interpret::InterpretError,
    },

    /// The output sink rejected bytes, or the configured size limit was
    /// exceeded.
    #[error("cannot write output: {0}")]
    OutputUnwritable(#[source] io::Error),

    /// The run was cancelled cooperatively; nothing was written.
    #[error("processing cancelled")]
    Cancelled,
}
