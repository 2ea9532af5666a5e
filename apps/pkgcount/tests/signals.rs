#![cfg(unix)]

use std::{
    fs,
    io::{BufRead, BufReader, Read},
    os::unix::process::ExitStatusExt,
    process::{Command, Stdio},
};
use tempfile::TempDir;

fn create_project(root: &std::path::Path, files: usize) {
    fs::write(root.join("go.mod"), "module github.com/acme/widget\n").unwrap();
    for i in 0..files {
        let dir = root.join(format!("pkg{}", i % 50));
        fs::create_dir_all(&dir).unwrap();
        let body = format!("package p\n\nimport (\n\t\"fmt\"\n\t\"github.com/acme/widget/p{}\"\n)\n", i % 7);
        fs::write(dir.join(format!("file{i}.go")), body).unwrap();
    }
}

#[test]
fn test_sigterm_is_handled_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    create_project(temp_dir.path(), 2000);

    let mut child = Command::new(env!("CARGO_BIN_EXE_pkgcount"))
        .arg("-d")
        .arg(temp_dir.path())
        .env("RUST_LOG", "info")
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // The handler is installed before the run logs its start line
    let mut stderr = BufReader::new(child.stderr.take().unwrap());
    let mut line = String::new();
    loop {
        line.clear();
        if stderr.read_line(&mut line).unwrap() == 0 {
            break;
        }
        if line.contains("Counting packages in") {
            break;
        }
    }

    let killed = Command::new("kill")
        .arg("-TERM")
        .arg(child.id().to_string())
        .status()
        .unwrap();
    assert!(killed.success());

    let mut rest = Vec::new();
    stderr.read_to_end(&mut rest).unwrap();
    let status = child.wait().unwrap();

    // Either the run finished first or it was cancelled; SIGTERM never kills it outright
    assert_eq!(status.signal(), None, "process died from a signal: {:?}", status);
    assert!(status.code().is_some_and(|code| code == 0 || code == 1), "exit status: {:?}", status);
}
