//! Reading individual config files.

use super::{
    ConfigLayer, ConfigLayerSource, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE, LoadedLayer, schema,
};
use crate::ConfigError;
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Read, parse and schema-check one layer. The file must exist.
pub(super) fn load_required_layer(
    source: ConfigLayerSource,
    path: &Path,
) -> Result<LoadedLayer, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|err| ConfigError::ReadFailed {
        path: path.into(),
        source: err,
    })?;
    let value: Value = json5::from_str(&text)?;
    schema::validate_layer_schema(&value, &layer_label(source, path))?;
    debug!("{source:?} layer parsed from {}", path.display());
    Ok(LoadedLayer {
        meta: ConfigLayer {
            source,
            path: path.into(),
        },
        value,
    })
}

/// `kind(path)`, used as the prefix of field errors.
pub(super) fn layer_label(source: ConfigLayerSource, path: &Path) -> String {
    let kind = match source {
        ConfigLayerSource::User => "user",
        ConfigLayerSource::Project => "project",
        ConfigLayerSource::Cwd => "cwd",
        ConfigLayerSource::Repo => "repo",
        ConfigLayerSource::Runtime => "runtime",
    };
    format!("{kind}({})", path.display())
}

pub(super) fn default_user_config_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(
        dirs.home_dir()
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE),
    )
}
