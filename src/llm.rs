//! The external text-generation collaborator.
//!
//! [`TextGenerator`] is the seam: production code shells out to a CLI
//! (`llm` by default) through [`CommandGenerator`]; tests plug in fakes.
//! The prompt is passed as the final positional argument and the reply is
//! read from stdout.
//!
//! Logs never include the prompt itself, only its length.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::PlannerError;
use crate::subprocess;

/// Turns a prompt into generated text.
pub trait TextGenerator {
    fn complete(&self, prompt: &str) -> Result<String, PlannerError>;
}

/// Runs a text-generation CLI once per prompt.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    cmd: String,
    extra_args: Vec<String>,
    model: Option<String>,
    timeout_sec: u64,
    cwd: PathBuf,
}

impl CommandGenerator {
    pub fn new(cmd: impl Into<String>, timeout_sec: u64) -> Self {
        Self {
            cmd: cmd.into(),
            extra_args: Vec::new(),
            model: None,
            timeout_sec,
            cwd: std::env::temp_dir(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// argv after the program name:
    /// ```text
    /// [extra args...] [--model <m>] <prompt>
    /// ```
    fn argv(&self, prompt: &str) -> Vec<String> {
        let mut args = self.extra_args.clone();
        if let Some(model) = &self.model {
            args.push("--model".to_owned());
            args.push(model.clone());
        }
        args.push(prompt.to_owned());
        args
    }
}

impl TextGenerator for CommandGenerator {
    fn complete(&self, prompt: &str) -> Result<String, PlannerError> {
        let program = resolve_command(&self.cmd)?;
        let args = self.argv(prompt);

        info!(
            generator = %program.display(),
            model = self.model.as_deref().unwrap_or("default"),
            timeout_sec = self.timeout_sec,
            prompt_len = prompt.len(),
            "invoking text generator"
        );
        debug!(extra_args = ?self.extra_args, "generator argv");

        let result = subprocess::run_command(
            &program,
            &args,
            &self.cwd,
            Some(Duration::from_secs(self.timeout_sec)),
        )
        .map_err(|e| PlannerError::GenerateSpawnFailed {
            detail: e.to_string(),
        })?;

        if result.timed_out {
            return Err(PlannerError::GenerateTimedOut {
                timeout_sec: self.timeout_sec,
            });
        }
        if !result.success() {
            return Err(PlannerError::GenerateNonZeroExit {
                exit_code: result.exit_code,
                stderr: result.stderr,
            });
        }

        info!(reply_len = result.stdout.len(), "text generator finished");
        Ok(result.stdout)
    }
}

/// Locate `cmd`: an explicit path (anything with a separator) is checked
/// as-is, a bare name is searched on `PATH`.
pub fn resolve_command(cmd: &str) -> Result<PathBuf, PlannerError> {
    resolve_command_with(cmd, std::env::var_os("PATH"))
}

fn resolve_command_with(
    cmd: &str,
    path_var: Option<std::ffi::OsString>,
) -> Result<PathBuf, PlannerError> {
    let not_found = || PlannerError::GeneratorNotFound {
        cmd: cmd.to_owned(),
    };

    if cmd.trim().is_empty() {
        return Err(not_found());
    }

    if cmd.contains(std::path::MAIN_SEPARATOR) || cmd.contains('/') {
        let p = PathBuf::from(cmd);
        return if is_executable(&p) { Ok(p) } else { Err(not_found()) };
    }

    path_var
        .iter()
        .flat_map(|paths| std::env::split_paths(paths))
        .map(|dir| dir.join(cmd))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(not_found)
}

/// A regular file, with an execute bit on Unix.
fn is_executable(path: &Path) -> bool {
    let Ok(meta) = path.metadata() else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}
