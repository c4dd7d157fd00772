//! jackc-drv - Compiler driver.
//!
//! Orchestrates the pipeline over one input path:
//!
//! 1. ingest the bundled standard library (`JackOS/`, relative to the
//!    working directory) so its classes populate the program scope, then
//!    discard its IR and obligations;
//! 2. compile the user's `.jack` file, or every `.jack` file directly
//!    inside the given directory (no recursion);
//! 3. run whole-program resolution;
//! 4. write one `.vm` file per user class next to its source.
//!
//! A source file is fully read into memory before tokenization, so its
//! handle closes before parsing begins; output files are only opened after
//! parsing and resolution succeed, so an aborted compile leaves no partial
//! output.

pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use jackc_lex::tokenize;
use jackc_par::program::Program;
use jackc_par::Parser;
use jackc_sem::resolve;
use jackc_util::{Handler, Symbol};

pub use error::{DriverError, Result};

/// Compilation settings.
#[derive(Clone, Debug)]
pub struct Config {
    /// A `.jack` source file or a directory of `.jack` files.
    pub path: PathBuf,

    /// Directory holding the standard-library classes.
    pub stdlib_dir: PathBuf,
}

impl Config {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            stdlib_dir: PathBuf::from("JackOS"),
        }
    }
}

/// One compilation run: owns the whole-program state from first stdlib
/// token to the last written output file.
pub struct Session {
    config: Config,
    pub program: Program,
    pub handler: Handler,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            program: Program::new(),
            handler: Handler::new(),
        }
    }

    /// Runs the whole pipeline. Warnings alone leave this `Ok`.
    pub fn compile(&mut self) -> Result<()> {
        let path = self.config.path.clone();
        let metadata =
            fs::metadata(&path).map_err(|_| DriverError::NoSuchPath(path.clone()))?;

        if metadata.is_file() && !has_jack_extension(&path) {
            return Err(DriverError::NotAJackFile(path));
        }

        self.ingest_stdlib()?;

        let out_dir = if metadata.is_dir() {
            info!("compiling directory {}", path.display());
            for entry in list_jack_files(&path)? {
                self.compile_unit(&entry, false)?;
            }
            path
        } else {
            info!("compiling {}", path.display());
            self.compile_unit(&path, false)?;
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            }
        };

        debug!("resolving deferred declarations");
        resolve(&mut self.program, &mut self.handler)?;

        self.write_outputs(&out_dir)
    }

    /// Parses every standard-library class for its symbols, then drops the
    /// IR and obligations the ingestion produced.
    fn ingest_stdlib(&mut self) -> Result<()> {
        let dir = self.config.stdlib_dir.clone();
        debug!("ingesting standard library from {}", dir.display());
        for entry in list_jack_files(&dir)? {
            self.compile_unit(&entry, true)?;
        }
        self.program.discard_stdlib_artifacts();
        Ok(())
    }

    /// Lexes and parses one translation unit into the program.
    fn compile_unit(&mut self, path: &Path, discard: bool) -> Result<()> {
        let source = fs::read_to_string(path).map_err(|source| DriverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stem = file_stem(path);
        debug!("parsing {}", path.display());

        self.program.begin_unit(Symbol::intern(&stem), discard);
        let tokens = tokenize(&source, &stem)?;
        Parser::new(tokens, &mut self.program, &mut self.handler).parse_class()?;
        Ok(())
    }

    /// Writes each surviving output buffer as `<class>.vm` in `dir`.
    fn write_outputs(&self, dir: &Path) -> Result<()> {
        for file in &self.program.outputs {
            let path = dir.join(format!("{}.vm", file.name));
            fs::write(&path, file.render()).map_err(|source| DriverError::Io {
                path: path.clone(),
                source,
            })?;
            debug!("wrote {}", path.display());
        }
        info!("wrote {} file(s)", self.program.outputs.len());
        Ok(())
    }
}

fn has_jack_extension(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "jack")
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The `.jack` files directly inside `dir`, in directory-iteration order.
fn list_jack_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).map_err(|_| DriverError::DirUnreadable(dir.to_path_buf()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DriverError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && has_jack_extension(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_jack_extension() {
        assert!(has_jack_extension(Path::new("Main.jack")));
        assert!(!has_jack_extension(Path::new("Main.vm")));
        assert!(!has_jack_extension(Path::new("jack")));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("src/Main.jack")), "Main");
        assert_eq!(file_stem(Path::new("Square.jack")), "Square");
    }

    #[test]
    fn test_missing_path_reported() {
        let mut session = Session::new(Config::new(PathBuf::from("does/not/exist")));
        let err = session.compile().unwrap_err();
        assert_eq!(err.to_string(), "No such file or directory does/not/exist");
    }
}
