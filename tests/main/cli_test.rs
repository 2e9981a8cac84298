//! CLI contract tests.

use assert_cmd::Command;

fn langbot(home: &tempfile::TempDir) -> Command {
    let mut cmd = match Command::cargo_bin("langbot") {
        Ok(cmd) => cmd,
        Err(err) => panic!("binary should build: {err}"),
    };
    cmd.env("HOME", home.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("LANGBOT_CONFIG_PATH")
        .env_remove("LANGBOT_GENERATION_MODEL")
        .env_remove("LANGBOT_TRANSLATION_PROVIDER")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("command should run");
    assert!(output.status.success(), "command should succeed");
    String::from_utf8(output.stdout).expect("stdout should be utf8")
}

#[test]
fn languages_lists_names_and_codes() {
    let home = tempfile::tempdir().expect("temp home");
    let out = stdout_of(langbot(&home).arg("languages"));
    assert_eq!(out.lines().count(), 11);
    assert!(out.lines().any(|l| l.starts_with("Chinese (Simplified)") && l.ends_with("zh-cn")));
    assert!(out.starts_with("English"));
}

#[test]
fn tones_lists_catalog() {
    let home = tempfile::tempdir().expect("temp home");
    let out = stdout_of(langbot(&home).arg("tones"));
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec!["Professional", "Neutral", "Friendly", "Assertive", "Concise", "Formal", "Casual"]
    );
}

#[test]
fn templates_lists_required_fields() {
    let home = tempfile::tempdir().expect("temp home");
    let out = stdout_of(langbot(&home).arg("templates"));
    assert!(out.contains("General Professional Email: recipient, sender"));
    assert!(out.contains("Meeting Request: subject, recipient, times, sender"));
}

#[test]
fn generate_without_credentials_reports_generation_stage() {
    let home = tempfile::tempdir().expect("temp home");
    let output = langbot(&home)
        .args(["generate", "--text", "Please approve the budget"])
        .output()
        .expect("command should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("generation client is not configured"), "stderr: {stderr}");
}

#[test]
fn unknown_language_is_a_usage_error() {
    let home = tempfile::tempdir().expect("temp home");
    let output = langbot(&home)
        .args(["generate", "--text", "hi", "--output-lang", "Klingon"])
        .output()
        .expect("command should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown language 'Klingon'"), "stderr: {stderr}");
}

#[test]
fn chat_rejects_unknown_slash_commands() {
    let home = tempfile::tempdir().expect("temp home");
    let out = stdout_of(
        langbot(&home)
            .arg("chat")
            .write_stdin("/histroy\n/history\n/quit\n"),
    );

    assert!(out.contains("Unknown command: /histroy"), "stdout: {out}");
    assert!(out.contains("No history yet."), "misspelled command stays out of history");
    assert!(!out.contains("Error ("), "nothing reaches the pipeline: {out}");
}
