use std::{
    env,
    io::Write,
    path::PathBuf,
    process::{Command, Output, Stdio},
};

fn bin_path() -> String {
    if let Ok(path) = env::var("CARGO_BIN_EXE_agora") {
        return path;
    }
    let mut fallback =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("manifest dir not set by cargo"));
    fallback.push("target");
    fallback.push("debug");
    fallback.push("agora");
    if cfg!(windows) {
        fallback.set_extension("exe");
    }
    if fallback.exists() {
        return fallback.to_string_lossy().into_owned();
    }
    panic!(
        "binary path not set by cargo test and fallback {:?} not found",
        fallback
    );
}

fn agora(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .env_remove("AGORA_MAX_DEPTH")
        .env_remove("AGORA_TRACE_DISPATCH")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run agora")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn program_file(source: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".agora")
        .tempfile()
        .expect("temp program file");
    file.write_all(source.as_bytes()).expect("write program");
    file
}

#[test]
fn eval_prints_the_print_string_of_the_result() {
    let output = agora(&["eval", "x VARIABLE: 6; x * 7"]);
    assert!(
        output.status.success(),
        "eval failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout(&output), "42");
}

#[test]
fn run_evaluates_a_program_file() {
    let file = program_file(
        "counter VARIABLE: (OBJECT: { \n\
             n PUBLIC VARIABLE: 0; \n\
             bump PUBLIC METHOD: { n: n + 1 } \n\
         }); \n\
         counter bump; counter bump; counter n\n",
    );
    let path = file.path().to_string_lossy().into_owned();
    let output = agora(&["run", &path]);
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout(&output), "2");
}

#[test]
fn syntax_errors_exit_with_failure() {
    let output = agora(&["eval", "x VARIABLE: ;"]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn runtime_errors_exit_with_failure() {
    let output = agora(&["eval", "OBJECT foo"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("foo"), "unexpected stderr: {stderr}");
}

#[test]
fn missing_program_file_is_reported() {
    let output = agora(&["run", "definitely/not/here.agora"]);
    assert!(!output.status.success());
}

#[test]
fn config_file_limits_evaluation_depth() {
    let config = program_file("max_depth = 30\n");
    let config_path = config.path().to_string_lossy().into_owned();
    let program = "down: n METHOD: { (n = 0) IFTRUE: 0 IFFALSE: { down: n - 1 } }; down: 200";

    let output = agora(&["--config", &config_path, "eval", program]);
    assert!(!output.status.success());

    let output = agora(&["eval", program]);
    assert!(
        output.status.success(),
        "default limit rejected the program: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout(&output), "0");
}

#[test]
fn invalid_config_is_rejected() {
    let config = program_file("depth = 3\n");
    let config_path = config.path().to_string_lossy().into_owned();
    let output = agora(&["--config", &config_path, "eval", "1"]);
    assert!(!output.status.success());
}
