//! CogMyra configuration: the `cogmyra.json5` schema and its layered loader.
//!
//! The CLI reads the stack from its working directory; embedders can load a
//! single file or build a [`CogmyraConfig`] in code.

mod error;
mod loader;
mod model;

pub use error::ConfigError;
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
pub use model::*;
