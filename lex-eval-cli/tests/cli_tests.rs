use std::process::Command;

fn run_lex_eval(args: &[&str]) -> Result<String, String> {
    let output = Command::new("cargo")
        .args(["run", "--bin", "lex-eval", "--"])
        .args(args)
        .output()
        .map_err(|e| format!("Failed to run lex-eval: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("Command failed: {}", stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[test]
fn help_lists_all_subcommands() {
    let help = run_lex_eval(&["--help"]).expect("help should succeed");
    for subcommand in [
        "check",
        "workflows",
        "metadata",
        "run",
        "eval",
        "compare",
        "config",
    ] {
        assert!(
            help.contains(subcommand),
            "help output is missing '{}'",
            subcommand
        );
    }
}

#[test]
fn version_matches_package() {
    let version = run_lex_eval(&["--version"]).expect("version should succeed");
    assert!(version.contains("0.1.0"));
}

#[test]
fn check_fails_against_unreachable_server() {
    // port 1 is never serving anything in the test environment
    let result = run_lex_eval(&["check", "--server", "http://127.0.0.1:1"]);
    assert!(result.is_err());
}
