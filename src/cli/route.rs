//! CLI route: loads configuration once and dispatches each command.

use crate::cli::parse::Commands;
use crate::config::{BackstackConfig, ConfigLoader};
use crate::error::NavigationError;
use crate::persistence::StateStore;
use crate::script::{Script, ScriptRunner};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime context for CLI execution: the resolved configuration.
pub struct RunContext {
    config: BackstackConfig,
}

impl RunContext {
    /// Load configuration from an explicit file, or from the project root.
    pub fn new(root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, NavigationError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(&path)?,
            None => ConfigLoader::load(&root)?,
        };
        if let Err(errors) = config.validate() {
            let joined = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
            return Err(NavigationError::Config(joined));
        }
        Ok(Self { config })
    }

    pub fn from_config(config: BackstackConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BackstackConfig {
        &self.config
    }

    /// Execute one command and return its printable output.
    pub fn execute(&self, command: &Commands) -> Result<String, NavigationError> {
        match command {
            Commands::Replay { file, save_state } => self.replay(file, save_state.as_deref()),
            Commands::Check { file } => {
                let script = read_script(file)?;
                Ok(format!("{}: {} command(s) OK", file.display(), script.len()))
            }
            Commands::Inspect { file } => inspect(file),
        }
    }

    fn replay(&self, file: &Path, save_state: Option<&Path>) -> Result<String, NavigationError> {
        let script = read_script(file)?;
        let report = ScriptRunner::new(&self.config).run(&script);
        let mut output = report.to_string();
        if let Some(path) = save_state {
            let saved_at = StateStore::new(path).save(&report.registry)?;
            info!(path = ?path, %saved_at, "Saved final navigation state");
            let _ = write!(output, "\nstate saved to {}", path.display());
        }
        Ok(output)
    }
}

fn read_script(file: &Path) -> Result<Script, NavigationError> {
    let source = std::fs::read_to_string(file)?;
    Script::parse(&source)
}

fn inspect(file: &Path) -> Result<String, NavigationError> {
    let Some(snapshot) = StateStore::new(file).load()? else {
        return Ok(format!("No saved state at {}", file.display()));
    };
    let registry = &snapshot.registry;
    let mut output = format!("saved at {}\n", snapshot.saved_at.to_rfc3339());
    let main = registry
        .main_container_id()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string());
    let _ = writeln!(output, "main container: {}", main);
    for container in registry.container_ids() {
        let _ = writeln!(output, "stack {}: [{}]", container, registry.stack(container).join(", "));
    }
    Ok(output.trim_end().to_string())
}
