//! Layered configuration loader.
//!
//! Layers are discovered around the working directory, checked against the
//! schema one by one, folded together and decoded into a `CogmyraConfig`.

mod layer_io;
mod merge;
mod schema;
mod utils;


use crate::{CogmyraConfig, ConfigError};
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "cogmyra.json5";
/// Holds user-level and repo-level config files.
const DEFAULT_CONFIG_DIR: &str = ".cogmyra";
const PROJECT_MARKERS: &[&str] = &[".git"];

/// Merged config together with the files it came from.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub config: CogmyraConfig,
    /// Contributing layers, lowest precedence first.
    pub layers: Vec<ConfigLayer>,
}

/// Where a layer was found. Variants are listed in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// `~/.cogmyra/cogmyra.json5`.
    User,
    /// `cogmyra.json5` at the project root.
    Project,
    /// `cogmyra.json5` in the working directory.
    Cwd,
    /// `.cogmyra/cogmyra.json5` at the project root.
    Repo,
    /// Explicit override files.
    Runtime,
}

/// A file that contributed to the merged config.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    pub source: ConfigLayerSource,
    pub path: PathBuf,
}

/// Inputs to layered loading; tests use these to avoid touching `$HOME`.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    pub cwd: PathBuf,
    /// `None` skips the user layer.
    pub user_config_path: Option<PathBuf>,
    /// Required files merged after every discovered layer, in order.
    pub runtime_paths: Vec<PathBuf>,
    /// Entries whose presence marks a directory as the project root.
    pub project_root_markers: Vec<String>,
}

impl LayeredConfigOptions {
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
            project_root_markers: PROJECT_MARKERS.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn with_user_path(mut self, path: Option<PathBuf>) -> Self {
        self.user_config_path = path;
        self
    }

    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().into());
        self
    }

    /// Optional layer locations in precedence order. Files may not exist.
    fn discover(&self, cwd: &Path) -> Vec<(ConfigLayerSource, PathBuf)> {
        let root = utils::find_project_root(cwd, &self.project_root_markers);
        if root.is_none() {
            debug!("no project root above {}", cwd.display());
        }
        let mut found = Vec::with_capacity(4);
        if let Some(path) = &self.user_config_path {
            found.push((ConfigLayerSource::User, path.clone()));
        }
        if let Some(root) = &root {
            found.push((ConfigLayerSource::Project, root.join(DEFAULT_CONFIG_FILE)));
        }
        found.push((ConfigLayerSource::Cwd, cwd.join(DEFAULT_CONFIG_FILE)));
        if let Some(root) = &root {
            found.push((
                ConfigLayerSource::Repo,
                root.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE),
            ));
        }
        found
    }
}

/// Accumulates layers while remembering which files were already merged.
struct LayerStack {
    merged: Value,
    layers: Vec<ConfigLayer>,
    seen: HashSet<PathBuf>,
}

impl LayerStack {
    fn new() -> Self {
        Self {
            merged: Value::Object(Map::new()),
            layers: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Load and merge `path` unless it was merged before.
    fn push(&mut self, source: ConfigLayerSource, path: &Path) -> Result<(), ConfigError> {
        if !self.seen.insert(utils::unique_path(path)) {
            debug!("{} already merged, ignoring {source:?} layer", path.display());
            return Ok(());
        }
        let LoadedLayer { meta, value } = layer_io::load_required_layer(source, path)?;
        merge::merge_layer(&mut self.merged, value);
        self.layers.push(meta);
        Ok(())
    }
}

impl CogmyraConfig {
    /// Read exactly one config file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("reading config file {}", path.display());
        let loaded = layer_io::load_required_layer(ConfigLayerSource::Runtime, path)?;
        config_from_value(loaded.value, "config")
    }

    /// Parse a config document held in memory.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("parsing inline config ({} bytes)", contents.len());
        config_from_value(json5::from_str(contents)?, "config")
    }

    /// Layered load from `cwd` with the default user config location.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Precedence, lowest first: user, project, cwd, repo, runtime.
    ///
    /// Missing discovered layers are skipped; runtime paths must exist. A file
    /// reachable through more than one layer is merged once, at its first
    /// position.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = utils::normalize_path(&options.cwd)?;
        let mut stack = LayerStack::new();
        for (source, path) in options.discover(&cwd) {
            if path.exists() {
                stack.push(source, &path)?;
            } else {
                debug!("no {source:?} layer at {}", path.display());
            }
        }
        for path in &options.runtime_paths {
            stack.push(ConfigLayerSource::Runtime, path)?;
        }

        let config = config_from_value(stack.merged, "effective")?;
        info!(
            "config resolved from {} layer(s) (cwd={})",
            stack.layers.len(),
            cwd.display()
        );
        Ok(LayeredConfig {
            config,
            layers: stack.layers,
        })
    }

    /// Checks that span more than one field's type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory.recent_limit < 1 {
            return Err(ConfigError::Invalid(
                "memory.recent_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn config_from_value(value: Value, label: &str) -> Result<CogmyraConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: CogmyraConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
