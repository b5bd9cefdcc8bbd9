//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use poly_config::PolyConfig;
use poly_core::{DecodeOptions, ShapePolicy};
use pretty_assertions::assert_eq;

#[test]
fn loads_decode_policy_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[decode]
unknown_shape = "reject"
"#,
        )?;

        let config: PolyConfig = Figment::from(Serialized::defaults(PolyConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.decode.unknown_shape, ShapePolicy::Reject);
        assert_eq!(config.decode_options(), DecodeOptions::strict());
        Ok(())
    });
}

#[test]
fn missing_section_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "# nothing configured\n")?;

        let config: PolyConfig = Figment::from(Serialized::defaults(PolyConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config, PolyConfig::default());
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".polyschema"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            ".polyschema/config.toml",
            "[decode]\nunknown_shape = \"reject\"\n",
        )?;

        let config = PolyConfig::load().expect("config loads");
        assert_eq!(config.decode.unknown_shape, ShapePolicy::Reject);
        Ok(())
    });
}

#[test]
fn invalid_policy_is_an_error() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".polyschema"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            ".polyschema/config.toml",
            "[decode]\nunknown_shape = \"sometimes\"\n",
        )?;

        assert!(PolyConfig::load().is_err());
        Ok(())
    });
}

#[cfg(target_os = "linux")]
#[test]
fn project_file_overrides_user_file() {
    Jail::expect_with(|jail| {
        let xdg = jail.directory().join("xdg");
        jail.set_env("XDG_CONFIG_HOME", xdg.display());
        std::fs::create_dir_all(jail.directory().join("xdg/polyschema"))
            .map_err(|e| e.to_string())?;
        std::fs::create_dir_all(jail.directory().join(".polyschema"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            "xdg/polyschema/config.toml",
            "[decode]\nunknown_shape = \"reject\"\n",
        )?;

        assert_eq!(
            PolyConfig::config_files(),
            [jail.directory().join("xdg/polyschema/config.toml")]
        );
        assert_eq!(
            PolyConfig::load().expect("config loads").decode_options(),
            DecodeOptions::strict()
        );

        jail.create_file(
            ".polyschema/config.toml",
            "[decode]\nunknown_shape = \"ignore\"\n",
        )?;
        assert_eq!(PolyConfig::config_files().len(), 2);
        assert_eq!(PolyConfig::load().expect("config loads"), PolyConfig::default());
        Ok(())
    });
}
