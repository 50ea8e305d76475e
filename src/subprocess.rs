//! Run the text-generator command directly (no shell) and collect its output.
//!
//! Stdin is closed, stdout and stderr are drained on their own threads into
//! bounded buffers, and the child is killed if it outlives the timeout.

use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Cap on bytes kept from each of stdout and stderr (4 MiB).
const MAX_OUTPUT_BYTES: u64 = 4 * 1024 * 1024;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the child was killed on timeout or ended by a signal.
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Spawn `program` with `args` in `cwd` and wait for it, at most `timeout`
/// when one is given.
pub fn run_command<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    cwd: &Path,
    timeout: Option<Duration>,
) -> std::io::Result<CommandOutput> {
    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("child stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("child stderr was not captured"))?;

    let stdout_reader = std::thread::spawn(move || read_capped(stdout));
    let stderr_reader = std::thread::spawn(move || read_capped(stderr));

    let (timed_out, exit_code) = wait(&mut child, timeout)?;

    let stdout = stdout_reader
        .join()
        .map_err(|_| std::io::Error::other("stdout reader thread panicked"))??;
    let stderr = stderr_reader
        .join()
        .map_err(|_| std::io::Error::other("stderr reader thread panicked"))??;

    Ok(CommandOutput {
        stdout,
        stderr,
        exit_code,
        timed_out,
    })
}

/// Returns `(timed_out, exit_code)`. A child that finishes right at the
/// deadline may be reported as timed out.
fn wait(child: &mut Child, timeout: Option<Duration>) -> std::io::Result<(bool, Option<i32>)> {
    let Some(timeout) = timeout else {
        return Ok((false, child.wait()?.code()));
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((false, status.code()));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok((true, None));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn read_capped(reader: impl Read) -> std::io::Result<String> {
    let mut buf = Vec::new();
    reader.take(MAX_OUTPUT_BYTES).read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh() -> &'static Path {
        Path::new("sh")
    }

    #[test]
    fn captures_stdout_and_exit_code() {
        let out = run_command(Path::new("echo"), &["party", "time"], &std::env::temp_dir(), None)
            .unwrap();

        assert_eq!(out.stdout.trim(), "party time");
        assert_eq!(out.exit_code, Some(0));
        assert!(out.success());
    }

    #[test]
    fn reports_nonzero_exit_and_stderr() {
        let out = run_command(sh(), &["-c", "echo oops >&2; exit 3"], &std::env::temp_dir(), None)
            .unwrap();

        assert_eq!(out.exit_code, Some(3));
        assert_eq!(out.stderr.trim(), "oops");
        assert!(!out.success());
    }

    #[test]
    fn kills_child_after_timeout() {
        let out = run_command(
            Path::new("sleep"),
            &["30"],
            &std::env::temp_dir(),
            Some(Duration::from_millis(150)),
        )
        .unwrap();

        assert!(out.timed_out);
        assert_eq!(out.exit_code, None);
        assert!(!out.success());
    }

    #[test]
    fn stdin_is_closed() {
        // `cat` would block forever on an inherited terminal.
        let out = run_command(
            Path::new("cat"),
            &[] as &[&str],
            &std::env::temp_dir(),
            Some(Duration::from_secs(5)),
        )
        .unwrap();

        assert!(out.success());
        assert!(out.stdout.is_empty());
    }

    #[test]
    fn missing_program_is_an_io_error() {
        let err = run_command(
            Path::new("partyplan-no-such-binary-xyz"),
            &[] as &[&str],
            &std::env::temp_dir(),
            None,
        )
        .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
