use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Build a CLI command isolated from the caller's environment and profile.
pub fn datacube(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_datacube"));
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("DATACUBE_BASE_URL");
    cmd.env_remove("DATACUBE_API_KEY");
    cmd.env_remove("DATACUBE_TIMEOUT_SECS");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run the CLI with a custom HOME directory.
pub fn run_cli(home: &Path, args: &[&str]) -> Output {
    datacube(home)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

/// Run the CLI on a blocking thread so a wiremock server on the test
/// runtime can answer it.
pub async fn run_cli_async(home: &Path, args: &[&str]) -> Output {
    let home: PathBuf = home.to_path_buf();
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    tokio::task::spawn_blocking(move || datacube(&home).args(&args).output())
        .await
        .expect("CLI task panicked")
        .expect("Failed to execute CLI")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Assert success and return stdout.
pub fn expect_success(output: &Output) -> String {
    assert!(
        output.status.success(),
        "CLI command failed\nstderr: {}",
        stderr(output)
    );
    stdout(output)
}
