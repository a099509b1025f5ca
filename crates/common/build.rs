use std::env;
use std::process::Command;

fn emit(key: &str, value: impl AsRef<str>) {
    println!("cargo:rustc-env={}={}", key, value.as_ref());
}

fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn repository_version() -> String {
    if let Ok(val) = env::var("CI_BUILD_REF") {
        if !val.is_empty() {
            return val;
        }
    }

    command_output("git", &["describe", "--always", "--dirty", "--long", "--tags"])
        .or_else(|| command_output("git", &["rev-parse", "--short", "HEAD"]))
        .unwrap_or_else(|| env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "unknown".into()))
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    emit(
        "BUILD_PROFILE",
        env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string()),
    );
    emit("REPO_VERSION", repository_version());
    emit("BUILD_TIMESTAMP", chrono::Utc::now().to_rfc3339());
    emit(
        "RUST_VERSION",
        command_output("rustc", &["--version"]).unwrap_or_else(|| "unknown".to_string()),
    );
}
