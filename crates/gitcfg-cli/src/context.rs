//! Per-invocation application context
//!
//! Resolves settings, the category registry and the git store from the
//! global command-line options.

use std::path::PathBuf;

use gitcfg_core::{CategoryRegistry, Engine, OutputFormat, Settings, SettingsLoader};
use gitcfg_git::{GitRunner, GitStore};

use crate::cli::GlobalOptions;
use crate::error::Result;

/// Everything a command needs to talk to the engine.
#[derive(Debug)]
pub struct AppContext {
    pub settings: Settings,
    pub registry: CategoryRegistry,
    pub store: GitStore,
}

impl AppContext {
    /// Load settings layers, apply flags and build the registry and store.
    pub fn load(options: &GlobalOptions) -> Result<Self> {
        let mut loader = SettingsLoader::new();
        if let Some(ref path) = options.config {
            loader = loader.with_file(path);
        }
        let mut settings = loader.load()?;
        if let Some(secs) = options.timeout {
            settings.set_timeout(secs, "--timeout")?;
        }

        let registry = settings.registry()?;

        let cwd = match options.directory {
            Some(ref dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let store = GitStore::new(GitRunner::new(absolute(cwd)?).with_timeout(settings.timeout()));

        tracing::debug!(
            timeout = ?settings.timeout(),
            format = %settings.format,
            categories = registry.len(),
            "Loaded application context"
        );

        Ok(Self {
            settings,
            registry,
            store,
        })
    }

    pub fn engine(&self) -> Engine<'_, &GitStore> {
        Engine::new(&self.registry, &self.store)
    }

    /// A command's `--format` flag, falling back to settings.
    pub fn format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.unwrap_or(self.settings.format)
    }
}

fn absolute(dir: PathBuf) -> Result<PathBuf> {
    Ok(std::path::absolute(dir)?)
}
