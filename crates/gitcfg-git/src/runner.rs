//! Bounded execution of the git executable
//!
//! Every invocation has a deadline. Output pipes are drained on helper
//! threads while the parent waits, so a chatty child can never block on a
//! full pipe and turn into a false timeout.

use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::error::{Error, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs `git` in a fixed working directory with optional environment
/// overrides.
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: PathBuf,
    cwd: PathBuf,
    timeout: Duration,
    /// `None` removes the variable from the child environment
    env: Vec<(OsString, Option<OsString>)>,
}

impl GitRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("git"),
            cwd: cwd.into(),
            timeout: DEFAULT_TIMEOUT,
            env: Vec::new(),
        }
    }

    /// Use another executable in place of `git` (builder pattern).
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a variable for the child process (builder pattern).
    pub fn with_env(mut self, name: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .push((name.as_ref().to_os_string(), Some(value.as_ref().to_os_string())));
        self
    }

    /// Set several variables for the child process (builder pattern).
    pub fn with_envs<I, K, V>(self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        vars.into_iter()
            .fold(self, |runner, (name, value)| runner.with_env(name, value))
    }

    /// Remove a variable from the child environment (builder pattern).
    pub fn without_env(mut self, name: impl AsRef<OsStr>) -> Self {
        self.env.push((name.as_ref().to_os_string(), None));
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The value git will see for `name`: overrides first, then the process
    /// environment. Empty values count as unset.
    pub fn env_var(&self, name: &str) -> Option<OsString> {
        let value = match self.env.iter().rev().find(|(key, _)| key == name) {
            Some((_, value)) => value.clone(),
            None => std::env::var_os(name),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Run git with `args` and return its stdout.
    ///
    /// A non-zero exit becomes [`Error::CommandFailed`] carrying stderr
    /// verbatim.
    pub fn run<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<Vec<u8>> {
        let command = self.describe(args);
        tracing::debug!(command = %command, cwd = %self.cwd.display(), timeout = ?self.timeout, "Running git");

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (name, value) in &self.env {
            match value {
                Some(value) => cmd.env(name, value),
                None => cmd.env_remove(name),
            };
        }

        let mut child = cmd.spawn().map_err(|source| Error::Spawn {
            command: command.clone(),
            source,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_reader = thread::spawn(move || drain(stdout));
        let stderr_reader = thread::spawn(move || drain(stderr));

        let Some(status) = child.wait_timeout(self.timeout)? else {
            // Readers finish once the killed child's pipes close
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(command = %command, timeout = ?self.timeout, "git timed out");
            return Err(Error::Timeout {
                command,
                after: self.timeout,
            });
        };

        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).trim_end().to_string();
            tracing::debug!(command = %command, code = ?status.code(), stderr = %stderr, "git failed");
            return Err(Error::CommandFailed {
                command,
                code: status.code(),
                stderr,
            });
        }
        Ok(stdout)
    }

    fn describe<S: AsRef<OsStr>>(&self, args: &[S]) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

fn drain(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}
