//! jackc - command-line entry point.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jackc_drv::{Config, Session};

/// Compiler for the Jack programming language.
///
/// Compiles a `.jack` file, or every `.jack` file directly inside a
/// directory, into one `.vm` file per class. The standard-library classes
/// are read from a `JackOS/` directory relative to the working directory.
#[derive(Parser, Debug)]
#[command(name = "jackc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiler for the Jack programming language")]
struct Cli {
    /// A .jack source file or a directory containing .jack files
    path: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let mut session = Session::new(Config::new(cli.path));
    if let Err(error) = session.compile() {
        eprintln!("{}", error);
        process::exit(1);
    }
}

/// Log output is opt-in via `RUST_LOG`; diagnostics print directly to
/// stderr so their format stays stable.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
