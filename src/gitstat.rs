//! Revision diff-stat collaborator.
//!
//! The report's "Lines changed" section comes from `git diff --stat`
//! between the two newest commits in history. The external process sits
//! behind the `DiffStat` trait so the engine can be tested without
//! spawning git.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Default bounded wait for the diff-stat subprocess.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Narrow interface over the external diff-stat command.
pub trait DiffStat {
    /// The literal command line, space-joined, for display in the report.
    fn command_line(&self, from: &str, to: &str) -> String;

    /// Run the diff-stat command and capture its stdout, waiting at most
    /// `timeout`. A timeout kills the process and is fatal for the run.
    fn diff_stat(
        &self,
        from: &str,
        to: &str,
        timeout: Duration,
    ) -> Result<String, Box<dyn std::error::Error>>;
}

/// Drain a child pipe to completion on its own thread, so the child never
/// blocks on a full pipe buffer while we wait for it to exit.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// `git diff --stat` against the local repository.
pub struct GitDiffStat;

impl DiffStat for GitDiffStat {
    fn command_line(&self, from: &str, to: &str) -> String {
        format!("git diff --stat {from} {to}")
    }

    fn diff_stat(
        &self,
        from: &str,
        to: &str,
        timeout: Duration,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let mut child = Command::new("git")
            .args(["diff", "--stat", from, to])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("git diff --stat: failed to run command: {e}"))?;

        let stdout_reader = drain(child.stdout.take());
        let stderr_reader = drain(child.stderr.take());

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if start.elapsed() >= timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(format!(
                            "git diff --stat: timed out after {}",
                            humantime::format_duration(timeout)
                        )
                        .into());
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(format!("git diff --stat: {e}").into());
                }
            }
        };

        let stdout = String::from_utf8_lossy(&stdout_reader.join().unwrap_or_default()).into_owned();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_reader.join().unwrap_or_default()).into_owned();
            return Err(format!("git diff --stat: command failed: {}", stderr.trim()).into());
        }

        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // serializes the tests that swap a fake git onto PATH
    #[cfg(unix)]
    static PATH_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn command_line_is_space_joined() {
        let cmd = GitDiffStat.command_line("abc", "def");
        assert_eq!(cmd, "git diff --stat abc def");
    }

    /// A fast child whose output exceeds the OS pipe buffer must come back
    /// in full, not be mistaken for a hung process and killed.
    #[cfg(unix)]
    #[test]
    fn large_diff_output_is_not_a_timeout() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let _guard = PATH_LOCK.lock().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("git");
        fs::write(&script, "#!/bin/sh\nhead -c 1048576 /dev/zero | tr '\\0' 'x'\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let old_path = std::env::var_os("PATH").unwrap_or_default();
        let new_path = format!("{}:{}", tmp.path().display(), old_path.to_string_lossy());
        std::env::set_var("PATH", &new_path);
        let result = GitDiffStat.diff_stat("aaa", "bbb", Duration::from_secs(2));
        std::env::set_var("PATH", old_path);

        let output = result.unwrap();
        assert_eq!(output.len(), 1_048_576);
        assert!(output.bytes().all(|b| b == b'x'));
    }

    /// A child that outlives the bounded wait is killed and reported.
    #[cfg(unix)]
    #[test]
    fn hung_process_is_killed_and_fatal() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let _guard = PATH_LOCK.lock().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("git");
        fs::write(&script, "#!/bin/sh\nsleep 30\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let old_path = std::env::var_os("PATH").unwrap_or_default();
        let new_path = format!("{}:{}", tmp.path().display(), old_path.to_string_lossy());
        std::env::set_var("PATH", &new_path);
        let start = Instant::now();
        let result = GitDiffStat.diff_stat("aaa", "bbb", Duration::from_millis(200));
        std::env::set_var("PATH", old_path);

        let err = result.unwrap_err();
        assert!(err.to_string().contains("timed out"));
        assert!(start.elapsed() < Duration::from_secs(10));
    }
}
