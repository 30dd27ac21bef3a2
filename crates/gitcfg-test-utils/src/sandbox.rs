//! Isolated git configuration environment.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Environment variables that would leak the host's configuration into a
/// sandboxed git invocation.
pub const LEAKY_ENV: &[&str] = &[
    "GIT_CONFIG_NOSYSTEM",
    "GIT_CONFIG",
    "GIT_CONFIG_PARAMETERS",
    "GIT_CONFIG_COUNT",
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GITCFG_TIMEOUT",
    "GITCFG_FORMAT",
];

/// A temporary directory holding private system and global config files, a
/// fake home and optionally a repository.
///
/// Realism level: **REAL**. Commands built by [`GitSandbox::command`] run the
/// actual `git` binary with the sandbox environment.
///
/// # Example
///
/// ```rust,no_run
/// use gitcfg_test_utils::GitSandbox;
///
/// let sandbox = GitSandbox::with_repo();
/// sandbox.git(&["config", "--global", "user.email", "a@x.com"]);
/// assert!(sandbox.global_config().exists());
/// ```
pub struct GitSandbox {
    temp_dir: TempDir,
    system_config: PathBuf,
    repo: Option<PathBuf>,
}

impl Default for GitSandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl GitSandbox {
    /// Sandbox without a repository; the working directory is outside git.
    ///
    /// # Panics
    /// Panics if the filesystem operations fail.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap_or_else(|e| panic!("GitSandbox: tempdir: {e}"));
        let root = temp_dir.path();
        for dir in ["home", "xdg", "etc", "outside"] {
            fs::create_dir_all(root.join(dir))
                .unwrap_or_else(|e| panic!("GitSandbox: failed to create {dir}: {e}"));
        }
        let system_config = root.join("etc/gitconfig");
        fs::write(&system_config, "")
            .unwrap_or_else(|e| panic!("GitSandbox: failed to write system config: {e}"));

        Self {
            temp_dir,
            system_config,
            repo: None,
        }
    }

    /// Sandbox with a freshly initialised repository as working directory.
    ///
    /// # Panics
    /// Panics if `git2::Repository::init` fails.
    pub fn with_repo() -> Self {
        let mut sandbox = Self::new();
        let repo = sandbox.root().join("work");
        git2::Repository::init(&repo).unwrap_or_else(|e| {
            panic!("GitSandbox: failed to init repository at {}: {e}", repo.display())
        });
        sandbox.repo = Some(repo);
        sandbox
    }

    /// Point the system scope at a location whose directory does not exist,
    /// so it can be neither created nor written, even by root (builder pattern).
    pub fn with_read_only_system(mut self) -> Self {
        self.system_config = self.root().join("missing/gitconfig");
        self
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn home(&self) -> PathBuf {
        self.root().join("home")
    }

    pub fn system_config(&self) -> &Path {
        &self.system_config
    }

    pub fn global_config(&self) -> PathBuf {
        self.home().join(".gitconfig")
    }

    /// The repository's `config` file, if a repository exists.
    pub fn local_config(&self) -> Option<PathBuf> {
        self.repo.as_ref().map(|repo| repo.join(".git/config"))
    }

    /// Where commands run: the repository, or a plain directory outside git.
    pub fn work_dir(&self) -> PathBuf {
        self.repo
            .clone()
            .unwrap_or_else(|| self.root().join("outside"))
    }

    /// Variables to set on every sandboxed process.
    pub fn envs(&self) -> Vec<(&'static str, OsString)> {
        vec![
            ("GIT_CONFIG_SYSTEM", self.system_config.clone().into_os_string()),
            ("GIT_CONFIG_GLOBAL", self.global_config().into_os_string()),
            ("HOME", self.home().into_os_string()),
            ("XDG_CONFIG_HOME", self.root().join("xdg").into_os_string()),
            ("GIT_CEILING_DIRECTORIES", self.root().as_os_str().to_os_string()),
        ]
    }

    /// A command for `program` with the sandbox environment and working
    /// directory applied.
    pub fn command(&self, program: impl AsRef<std::ffi::OsStr>) -> Command {
        let mut cmd = Command::new(program);
        cmd.current_dir(self.work_dir());
        for name in LEAKY_ENV {
            cmd.env_remove(name);
        }
        cmd.envs(self.envs());
        cmd
    }

    /// Run `git` inside the sandbox and return its stdout.
    ///
    /// # Panics
    /// Panics if git cannot be started or exits unsuccessfully.
    pub fn git(&self, args: &[&str]) -> String {
        let output = self
            .command("git")
            .args(args)
            .output()
            .unwrap_or_else(|e| panic!("GitSandbox: failed to run `git {args:?}`: {e}"));
        if !output.status.success() {
            panic!(
                "GitSandbox: `git {args:?}` failed:\n{}",
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Overwrite the global config file with raw content.
    pub fn write_global(&self, content: &str) {
        fs::write(self.global_config(), content)
            .unwrap_or_else(|e| panic!("GitSandbox: failed to write global config: {e}"));
    }

    /// Overwrite the system config file with raw content.
    pub fn write_system(&self, content: &str) {
        fs::write(&self.system_config, content)
            .unwrap_or_else(|e| panic!("GitSandbox: failed to write system config: {e}"));
    }
}
