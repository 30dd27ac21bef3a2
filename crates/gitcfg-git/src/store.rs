//! [`ConfigStore`] backed by the git executable

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository, RepositoryOpenFlags};
use gitcfg_core::{ConfigStore, MutationRequest, RawEntry, Scope, ScopeMetadata, StoreResult};

use crate::error::Result;
use crate::parse::parse_config_list;
use crate::runner::GitRunner;

const LIST_ARGS: &[&str] = &["config", "--list", "--show-scope", "--show-origin", "-z"];

/// Reads and writes configuration through `git config`.
///
/// git does all file parsing and include expansion; this store only runs
/// commands, parses the listing and works out where each scope lives.
#[derive(Debug, Clone)]
pub struct GitStore {
    runner: GitRunner,
}

impl GitStore {
    pub fn new(runner: GitRunner) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &GitRunner {
        &self.runner
    }

    /// Location of the system file, unless git is told to ignore it.
    pub fn system_path(&self) -> Option<PathBuf> {
        if self.runner.env_var("GIT_CONFIG_NOSYSTEM").is_some() {
            return None;
        }
        if let Some(path) = self.runner.env_var("GIT_CONFIG_SYSTEM") {
            return Some(PathBuf::from(path));
        }
        git2::Config::find_system()
            .ok()
            .or_else(|| Some(PathBuf::from("/etc/gitconfig")))
    }

    /// Location of the global file git would read and write.
    ///
    /// `~/.gitconfig` wins when it exists; otherwise an existing XDG file is
    /// used; otherwise `~/.gitconfig` is where git would create it.
    pub fn global_path(&self) -> Option<PathBuf> {
        if let Some(path) = self.runner.env_var("GIT_CONFIG_GLOBAL") {
            return Some(PathBuf::from(path));
        }
        let home = self
            .runner
            .env_var("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir);

        let dotfile = home.as_ref().map(|home| home.join(".gitconfig"));
        if dotfile.as_deref().is_some_and(Path::is_file) {
            return dotfile;
        }

        let xdg = self
            .runner
            .env_var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| home.as_ref().map(|home| home.join(".config")))
            .map(|dir| dir.join("git").join("config"));
        if xdg.as_deref().is_some_and(Path::is_file) {
            return xdg;
        }

        dotfile
    }

    /// The `config` file of the repository containing the working directory.
    pub fn local_path(&self) -> Result<Option<PathBuf>> {
        let ceilings: Vec<PathBuf> = self
            .runner
            .env_var("GIT_CEILING_DIRECTORIES")
            .map(|dirs| std::env::split_paths(&dirs).collect())
            .unwrap_or_default();

        match Repository::open_ext(self.runner.cwd(), RepositoryOpenFlags::empty(), &ceilings) {
            Ok(repo) => Ok(Some(repo.path().join("config"))),
            Err(e) if e.code() == ErrorCode::NotFound => {
                tracing::debug!(cwd = %self.runner.cwd().display(), "Not inside a repository");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn metadata(&self) -> Result<Vec<ScopeMetadata>> {
        let candidates = [
            (Scope::System, self.system_path()),
            (Scope::Global, self.global_path()),
            (Scope::Local, self.local_path()?),
        ];

        Ok(candidates
            .into_iter()
            .filter_map(|(scope, path)| path.map(|path| (scope, path)))
            .map(|(scope, path)| {
                let writable = is_writable(&path);
                tracing::debug!(scope = %scope, path = %path.display(), writable, "Discovered scope");
                ScopeMetadata::new(scope, path, writable)
            })
            .collect())
    }
}

impl ConfigStore for GitStore {
    fn read_entries(&self) -> StoreResult<Vec<RawEntry>> {
        let output = self.runner.run(LIST_ARGS)?;
        Ok(parse_config_list(&output, self.runner.cwd())?)
    }

    fn scope_metadata(&self) -> StoreResult<Vec<ScopeMetadata>> {
        Ok(self.metadata()?)
    }

    fn write(&self, request: &MutationRequest) -> StoreResult<()> {
        let scope_flag = format!("--{}", request.scope());
        let args: Vec<&str> = match request {
            MutationRequest::Set(set) => vec![
                "config",
                scope_flag.as_str(),
                "--replace-all",
                "--",
                set.key.as_str(),
                set.value.as_str(),
            ],
            MutationRequest::Unset(unset) => vec![
                "config",
                scope_flag.as_str(),
                "--unset-all",
                "--",
                unset.key.as_str(),
            ],
        };
        self.runner.run(args.as_slice())?;
        tracing::debug!(action = request.action(), key = request.key(), scope = %request.scope(), "Wrote configuration");
        Ok(())
    }
}

/// An existing file is writable if it opens for append; a missing one if
/// its directory accepts a new file.
fn is_writable(path: &Path) -> bool {
    if path.exists() {
        return OpenOptions::new().append(true).open(path).is_ok();
    }
    path.parent()
        .is_some_and(|dir| tempfile::tempfile_in(dir).is_ok())
}
