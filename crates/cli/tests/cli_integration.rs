use std::process::{Command, Output};

fn demo() -> Command {
    Command::new(env!("CARGO_BIN_EXE_flagdecl-demo"))
}

fn run(args: &[&str]) -> Output {
    demo()
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run flagdecl-demo")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn help_works() {
    let out = run(&["--help"]);
    assert!(
        out.status.success(),
        "flagdecl-demo --help failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        stderr(&out),
    );
    let stdout = stdout(&out);
    assert!(
        stdout.contains("This is a demo of the flagdecl library.")
            && stdout.contains("  --my-string, -s\n    This is a string flag.")
            && stdout.contains("  --sleep\n    Sleep duration between processes in milliseconds.\n    Default: 5000"),
        "unexpected help output:\n{stdout}"
    );
    assert!(!stdout.contains("--my-deprecated"), "{stdout}");
    assert!(!stdout.contains("--help"), "{stdout}");
}

#[test]
fn help_wins_over_invalid_values() {
    let out = run(&["--sleep=10", "-h"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert!(stdout(&out).contains("--my-number, -n"));
}

#[test]
fn values_and_commands_are_printed() {
    let out = run(&["build", "-n", "5", "extra", "--my-string=hi", "-b"]);
    assert!(
        out.status.success(),
        "status: {}\nstderr:\n{}",
        out.status,
        stderr(&out),
    );
    let stdout = stdout(&out);
    assert!(stdout.contains("\"my-number\": 5.0"), "{stdout}");
    assert!(stdout.contains("\"hi\""), "{stdout}");
    assert!(stdout.contains("\"sleep\": 5000"), "{stdout}");
    assert!(stdout.contains("\"my-boolean\": Some(\n        true,\n    )"), "{stdout}");
    assert!(stdout.contains("command: build\ncommand: extra"), "{stdout}");
}

#[test]
fn defaults_apply_without_arguments() {
    let out = run(&[]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    let stdout = stdout(&out);
    assert!(stdout.contains("\"my-number\": 0.0"), "{stdout}");
    assert!(stdout.contains("\"my-string\": None"), "{stdout}");
    assert!(!stdout.contains("command:"), "{stdout}");
}

#[test]
fn expected_failure_exits_with_message() {
    let out = run(&["--sleep=100"]);
    assert_eq!(out.status.code(), Some(1), "stdout:\n{}", stdout(&out));
    let stderr = stderr(&out);
    assert!(
        stderr.contains(">> The sleep time must be greater than 200 ms."),
        "{stderr}"
    );
    assert!(stdout(&out).is_empty());

    let at_minimum = run(&["--sleep=200"]);
    assert_eq!(at_minimum.status.code(), Some(1));
}

#[test]
fn invalid_value_is_reported_as_error() {
    let out = run(&["-n", "abc"]);
    assert!(!out.status.success());
    let stderr = stderr(&out);
    assert!(stderr.contains("invalid value \"abc\""), "{stderr}");
    assert!(!stderr.contains(">> "), "{stderr}");
}

#[test]
fn print_schema_emits_json() {
    let out = run(&["--print-schema"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));

    let schema: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("schema output is not JSON");
    let flags = schema["flags"].as_array().expect("flags array");
    let sleep = flags
        .iter()
        .find(|f| f["long"] == "sleep")
        .expect("sleep flag in schema");
    assert_eq!(sleep["has-default"], true);

    let deprecated = flags
        .iter()
        .find(|f| f["long"] == "my-deprecated")
        .expect("hidden flags are still listed");
    assert_eq!(deprecated["hidden"], true);
}
