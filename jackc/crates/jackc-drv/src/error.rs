//! Driver error types.
//!
//! Everything that can stop a compilation: path problems, I/O failures,
//! a missing standard library, and fatal diagnostics bubbled up from the
//! phases. The `Display` of each variant is the exact message printed to
//! the user, so [`main`](crate) prints errors with no extra prefix and the
//! diagnostic format stays intact.

use std::path::PathBuf;

use jackc_util::Diagnostic;
use thiserror::Error;

/// All errors the driver can report.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The input path does not exist.
    #[error("No such file or directory {}", .0.display())]
    NoSuchPath(PathBuf),

    /// The input file is not a `.jack` source file.
    #[error("{} is not a Jack source file.", .0.display())]
    NotAJackFile(PathBuf),

    /// A directory could not be opened, including a missing `JackOS/`.
    #[error("Couldn't open directory {}", .0.display())]
    DirUnreadable(PathBuf),

    /// A source file could not be read or an output file written.
    #[error("Unable to open file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fatal diagnostic from the lexer, parser, or resolver.
    #[error(transparent)]
    Compile(#[from] Diagnostic),
}

pub type Result<T> = std::result::Result<T, DriverError>;
