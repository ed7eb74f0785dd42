use std::path::Path;
use std::process::{Command, Output};

mod common;

use self::common::util::with_tmp_path;

fn run(exe: &str, args: &[&str]) -> Output {
    Command::new(exe).args(args).env_remove("RUST_LOG").output().unwrap()
}

fn put(path: &Path, args: &[&str]) -> Output {
    let mut all = vec![path.to_str().unwrap()];
    all.extend_from_slice(args);
    run(env!("CARGO_BIN_EXE_put"), &all)
}

fn get(path: &Path, args: &[&str]) -> Output {
    let mut all = vec![path.to_str().unwrap()];
    all.extend_from_slice(args);
    run(env!("CARGO_BIN_EXE_get"), &all)
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_put_then_get() {
    with_tmp_path(|path| {
        let out = put(&path, &["POSIX", "8", "2", "3"]);
        assert!(out.status.success(), "{}", stderr(&out));
        let log = stderr(&out);
        for step in 0..3 {
            assert!(log.contains(&format!("[0] INFO put finished step {}\n", step)), "{}", log);
        }

        let out = get(&path, &["BP"]);
        assert!(out.status.success(), "{}", stderr(&out));
        let dump = stderr(&out);
        let values = "0, 1, 2, 3, 4, 5, 6, 7\n";
        let expected = format!(
            "0 dataset_0/array_0 8 double\n{}0 dataset_1/array_0 8 double\n{}",
            values, values
        );
        assert_eq!(dump.matches(expected.as_str()).count(), 3, "{}", dump);
    })
}

#[test]
fn test_put_element_type() {
    with_tmp_path(|path| {
        let out = put(&path, &["POSIX", "3", "1", "1", "--type", "unsigned char"]);
        assert!(out.status.success(), "{}", stderr(&out));

        let out = get(&path, &["POSIX", "--verbose"]);
        assert!(out.status.success(), "{}", stderr(&out));
        let dump = stderr(&out);
        assert!(dump.contains("0 dataset_0/array_0 3 unsigned char\n0, 1, 2\n"), "{}", dump);
        assert!(dump.contains("[0] DEBUG get finished step 0"), "{}", dump);
    })
}

#[test]
fn test_put_missing_arguments() {
    with_tmp_path(|path| {
        let out = put(&path, &["POSIX", "8", "2"]);
        assert!(!out.status.success());
        assert!(!path.exists());
    })
}

#[test]
fn test_unknown_method() {
    with_tmp_path(|path| {
        let out = put(&path, &["FLEXPATH", "8", "2", "3"]);
        assert!(!out.status.success());
        assert!(stderr(&out).contains("unknown method"), "{}", stderr(&out));
    })
}

#[test]
fn test_get_missing_file() {
    with_tmp_path(|path| {
        let out = get(&path, &["POSIX"]);
        assert!(!out.status.success());
        assert_eq!(out.status.code(), Some(1));
        let log = stderr(&out);
        assert!(log.contains("[0] ERROR"), "{}", log);
        // reported once, through the logger
        assert!(!log.lines().any(|line| line.starts_with("Error:")), "{}", log);
    })
}
