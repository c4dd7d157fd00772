//! CLI-level tests: argument validation, path handling, exit codes, and
//! the shape of driver errors.

mod common;

use common::{jackc, project, write_source};
use predicates::prelude::*;

#[test]
fn test_help() {
    let dir = project();
    jackc(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("jackc"));
}

#[test]
fn test_version() {
    let dir = project();
    jackc(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jackc"));
}

#[test]
fn test_missing_path_argument() {
    let dir = project();
    jackc(dir.path()).assert().failure();
}

#[test]
fn test_nonexistent_path() {
    let dir = project();
    jackc(dir.path())
        .arg("Nope.jack")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such file or directory Nope.jack"));
}

#[test]
fn test_non_jack_file_rejected() {
    let dir = project();
    write_source(dir.path(), "notes.txt", "not jack");
    jackc(dir.path())
        .arg("notes.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("notes.txt is not a Jack source file."));
}

#[test]
fn test_missing_stdlib_aborts() {
    // A project without JackOS/ cannot compile anything.
    let dir = tempfile::TempDir::new().unwrap();
    write_source(dir.path(), "Main.jack", "class Main { }");
    jackc(dir.path())
        .arg("Main.jack")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Couldn't open directory JackOS"));
}

#[test]
fn test_warnings_do_not_fail_the_build() {
    let dir = project();
    write_source(
        dir.path(),
        "Main.jack",
        "class Main {\n    function void main() {\n        do Output.printInt(1, 2);\n        return;\n    }\n}\n",
    );
    jackc(dir.path())
        .arg("Main.jack")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Main.jack: Warning, line 3, call arguments do not match subroutine declaration.",
        ));
}

#[test]
fn test_parse_error_exits_nonzero() {
    let dir = project();
    write_source(
        dir.path(),
        "Main.jack",
        "class Main {\n    function void main() {\n        var int x;\n        let x = 1\n    }\n}\n",
    );
    jackc(dir.path())
        .arg("Main.jack")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Main.jack: Error, line 5, at or near '}', Expected a ';'.",
        ));
}

#[test]
fn test_unknown_type_error_format() {
    let dir = project();
    write_source(
        dir.path(),
        "Main.jack",
        "class Main {\n    function void main() {\n        var Ghost g;\n        let g = null;\n        return;\n    }\n}\n",
    );
    jackc(dir.path())
        .arg("Main.jack")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Main.jack: Error, line 3, Unknown type 'Ghost'.",
        ));
}

#[test]
fn test_unreachable_code_error() {
    let dir = project();
    write_source(
        dir.path(),
        "Main.jack",
        "class Main {\n    method void f() {\n        var int x;\n        return;\n        let x = 1;\n    }\n}\n",
    );
    jackc(dir.path())
        .arg("Main.jack")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Main.jack: Error, line 5, at or near 'let', Unreachable code.",
        ));
}

#[test]
fn test_lexical_error_names_file_and_line() {
    let dir = project();
    write_source(
        dir.path(),
        "Main.jack",
        "class Main {\n    // fine\n    function void main() { let ! = 1; }\n}\n",
    );
    jackc(dir.path())
        .arg("Main.jack")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Main.jack: Error, line 3, Invalid symbol '!'.",
        ));
}
