//! # poly-config
//!
//! Optional settings layer for polyschema. `poly-core` never reads files or
//! the environment; callers that want decode behaviour to be configurable
//! load a [`PolyConfig`] and pass [`PolyConfig::decode_options`] to the
//! `decode_*_with` methods.
//!
//! Later layers override earlier ones:
//!
//! ```text
//! defaults
//!   < $XDG_CONFIG_HOME/polyschema/config.toml
//!   < ./.polyschema/config.toml
//!   < POLYSCHEMA_<SECTION>__<KEY>
//! ```
//!
//! ```no_run
//! use poly_config::PolyConfig;
//! use poly_core::{SchemaOrArray, UnionCodec};
//!
//! let options = PolyConfig::load().expect("config").decode_options();
//! let items: SchemaOrArray =
//!     SchemaOrArray::decode_json_with(br#"{"type":"string"}"#, &options).expect("items");
//! ```

mod decode;
mod error;

pub use decode::DecodeConfig;
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use poly_core::DecodeOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "polyschema";
const PROJECT_FILE: &str = ".polyschema/config.toml";
const ENV_PREFIX: &str = "POLYSCHEMA_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PolyConfig {
    #[serde(default)]
    pub decode: DecodeConfig,
}

impl PolyConfig {
    /// Extract the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a file is unreadable or a value
    /// does not deserialize (for example an unknown `unknown_shape`).
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    /// The provider chain behind [`PolyConfig::load`].
    #[must_use]
    pub fn figment() -> Figment {
        Self::config_files()
            .into_iter()
            .fold(Figment::from(Serialized::defaults(Self::default())), |figment, path| {
                figment.merge(Toml::file(path))
            })
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// TOML files that exist, lowest priority first.
    #[must_use]
    pub fn config_files() -> Vec<PathBuf> {
        let user = dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"));
        user.into_iter()
            .chain(Some(PathBuf::from(PROJECT_FILE)))
            .filter(|path| path.exists())
            .collect()
    }

    #[must_use]
    pub const fn decode_options(&self) -> DecodeOptions {
        self.decode.options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poly_core::ShapePolicy;

    #[test]
    fn default_config_is_permissive() {
        let config = PolyConfig::default();
        assert_eq!(config.decode.unknown_shape, ShapePolicy::Ignore);
        assert_eq!(config.decode_options(), DecodeOptions::default());
    }

    #[test]
    fn figment_extracts_defaults() {
        figment::Jail::expect_with(|jail| {
            let home = jail.directory().to_path_buf();
            jail.set_env("XDG_CONFIG_HOME", home.display());
            let config: PolyConfig = PolyConfig::figment().extract()?;
            assert_eq!(config, PolyConfig::default());
            Ok(())
        });
    }
}
