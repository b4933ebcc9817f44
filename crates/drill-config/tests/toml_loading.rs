//! Integration tests for TOML and environment configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use std::path::{Path, PathBuf};

use drill_config::DrillConfig;
use drill_core::enums::{PreamblePolicy, Side};
use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};

#[test]
fn loads_deck_and_render_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[deck]
name = "Black repertoire"
notetype = "Chess Line"
side = "black"

[render]
pieces = "KDTLS"
preamble = "discard"
"#,
        )?;

        let config: DrillConfig = Figment::from(Serialized::defaults(DrillConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.deck.name, "Black repertoire");
        assert_eq!(config.deck.notetype, "Chess Line");
        assert_eq!(config.deck.side, Side::Black);
        assert_eq!(config.render.pieces, "KDTLS");
        assert_eq!(config.render.preamble, PreamblePolicy::Discard);
        assert!(config.validate().is_ok());
        Ok(())
    });
}

#[test]
fn loads_imports_by_deck_name() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[imports."White repertoire"]
side = "white"
files = ["studies/italian.pgn", "studies/london.pgn"]
"#,
        )?;

        let config: DrillConfig = Figment::from(Serialized::defaults(DrillConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        let import = config.studies_for("White repertoire").expect("import recorded");
        assert_eq!(import.side, Side::White);
        assert_eq!(
            import.files,
            vec![
                PathBuf::from("studies/italian.pgn"),
                PathBuf::from("studies/london.pgn")
            ]
        );
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_from_root() {
    Jail::expect_with(|jail| {
        std::fs::create_dir(jail.directory().join(".drill")).map_err(|e| e.to_string())?;
        jail.create_file(
            ".drill/config.toml",
            r#"
[deck]
name = "Openings"

[store]
namespace = "drill"
"#,
        )?;

        let config = DrillConfig::load_from(Path::new(".")).expect("config loads");
        assert_eq!(config.deck.name, "Openings");
        assert_eq!(config.store.namespace, "drill");
        assert_eq!(config.deck.notetype, "Basic");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[deck]
name = "From toml"
side = "white"
"#,
        )?;
        jail.set_env("DRILL_DECK__NAME", "From env");
        jail.set_env("DRILL_DECK__SIDE", "black");

        let config: DrillConfig = Figment::from(Serialized::defaults(DrillConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("DRILL_").split("__"))
            .extract()?;

        assert_eq!(config.deck.name, "From env");
        assert_eq!(config.deck.side, Side::Black);
        Ok(())
    });
}

#[test]
fn invalid_side_fails_extraction() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[deck]
side = "purple"
"#,
        )?;

        let result: Result<DrillConfig, _> =
            Figment::from(Serialized::defaults(DrillConfig::default()))
                .merge(Toml::file("config.toml"))
                .extract();
        assert!(result.is_err());
        Ok(())
    });
}
