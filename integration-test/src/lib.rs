//! Test driver for the argbind demo programs.
//!
//! Builds the demo binaries once, then runs each invocation in a fresh
//! temporary directory so the help files they write never collide.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::sync::Once;

use tempfile::TempDir;

static BUILD_INIT: Once = Once::new();

/// Output of one finished demo run.
pub struct DemoRun {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    /// Working directory the demo ran in. Help files land here.
    pub dir: TempDir,
}

impl DemoRun {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Lines of stdout with the given prefix.
    pub fn lines_starting_with(&self, prefix: &str) -> Vec<&str> {
        self.stdout
            .lines()
            .filter(|line| line.starts_with(prefix))
            .collect()
    }

    /// The value printed after `key` and a colon, if present.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.stdout.lines().find_map(|line| {
            let rest = line.strip_prefix(key)?.strip_prefix(':')?;
            Some(rest.trim())
        })
    }

    pub fn help_file(&self, commands: &[&str]) -> PathBuf {
        let mut name = String::from(".");
        for command in commands {
            name.push_str(command);
            name.push('_');
        }
        name.push_str("help_file");
        self.dir.path().join(name)
    }
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..")
}

fn target_dir() -> PathBuf {
    workspace_root().join("target").join("debug")
}

/// Build the demo binaries once per test process.
pub fn ensure_binaries() {
    BUILD_INIT.call_once(|| {
        let status = Command::new("cargo")
            .args(["build", "-p", "argbind", "--bins"])
            .current_dir(workspace_root())
            .status()
            .expect("failed to run cargo build");
        assert!(status.success(), "cargo build -p argbind --bins failed");
    });
}

/// Run demo `binary` with `args` inside a new temporary directory.
pub fn run(binary: &str, args: &[&str]) -> std::io::Result<DemoRun> {
    ensure_binaries();
    let dir = tempfile::tempdir()?;
    let output = Command::new(target_dir().join(binary))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()?;
    Ok(DemoRun {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        dir,
    })
}
