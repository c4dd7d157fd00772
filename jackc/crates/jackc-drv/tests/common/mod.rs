//! Shared helpers for the end-to-end tests: a temporary project directory
//! carrying a stub standard library, and the compiler binary to run in it.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

/// Minimal standard-library classes: enough surface for the OS calls the
/// compiler emits (`Memory.alloc`, `Math.multiply`, `String.new`) and for
/// the types test programs mention.
const STDLIB: &[(&str, &str)] = &[
    (
        "Math.jack",
        "class Math {\n\
         \x20   function int multiply(int x, int y) { return 0; }\n\
         \x20   function int divide(int x, int y) { return 0; }\n\
         \x20   function int max(int a, int b) { return a; }\n\
         }\n",
    ),
    (
        "Memory.jack",
        "class Memory {\n\
         \x20   function Array alloc(int size) { return null; }\n\
         \x20   function void deAlloc(Array o) { return; }\n\
         }\n",
    ),
    (
        "Array.jack",
        "class Array {\n\
         \x20   function Array new(int size) { return null; }\n\
         \x20   method void dispose() { return; }\n\
         }\n",
    ),
    (
        "String.jack",
        "class String {\n\
         \x20   constructor String new(int maxLength) { return this; }\n\
         \x20   method String appendChar(char c) { return this; }\n\
         \x20   method void dispose() { return; }\n\
         }\n",
    ),
    (
        "Output.jack",
        "class Output {\n\
         \x20   function void printInt(int i) { return; }\n\
         \x20   function void printString(String s) { return; }\n\
         }\n",
    ),
];

/// Creates a project directory containing the stub `JackOS/`.
pub fn project() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp directory");
    let stdlib = dir.path().join("JackOS");
    fs::create_dir(&stdlib).expect("failed to create JackOS directory");
    for (name, source) in STDLIB {
        fs::write(stdlib.join(name), source).expect("failed to write stdlib class");
    }
    dir
}

/// Writes a source file into the project.
pub fn write_source(dir: &Path, name: &str, source: &str) {
    fs::write(dir.join(name), source).expect("failed to write source file");
}

/// The compiler binary, running inside the project directory.
pub fn jackc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jackc").expect("jackc binary not built");
    cmd.current_dir(dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Reads an emitted `.vm` file as a list of instruction lines.
pub fn vm_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("missing output file {}", path.display()))
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}
