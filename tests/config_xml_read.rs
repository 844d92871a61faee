use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use tagmove::config::{CONFIG_ENV, load_config, load_config_from_xml_path};
use tagmove::{CollisionPolicy, Config, LogLevel, PathConversion, default_config_path};

#[test]
#[serial]
fn env_override_points_at_file() {
    let td = tempdir().unwrap();
    let base = dunce::canonicalize(td.path()).unwrap();
    let cfg = base.join("custom.xml");
    fs::write(
        &cfg,
        "<config>\n  <format>%a/%t</format>\n  <on_collision>abort</on_collision>\n</config>",
    )
    .unwrap();

    unsafe {
        std::env::set_var(CONFIG_ENV, &cfg);
    }
    let resolved = default_config_path().unwrap();
    let loaded = load_config().unwrap();
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }

    assert_eq!(resolved, cfg);
    let (path, xml) = loaded.expect("config should load");
    assert_eq!(path, cfg);
    let mut c = Config::default();
    xml.apply_to(&mut c).unwrap();
    assert_eq!(c.format.as_deref(), Some("%a/%t"));
    assert_eq!(c.on_collision, CollisionPolicy::Abort);
}

#[test]
#[serial]
fn env_override_directory_means_config_xml() {
    let td = tempdir().unwrap();
    let base = dunce::canonicalize(td.path()).unwrap();

    unsafe {
        std::env::set_var(CONFIG_ENV, &base);
    }
    let resolved = default_config_path().unwrap();
    let loaded = load_config().unwrap();
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }

    assert_eq!(resolved, base.join("config.xml"));
    assert!(loaded.is_none(), "missing file is not an error");
}

#[test]
#[serial]
fn malformed_file_is_an_error() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("config.xml");
    fs::write(&cfg, "<config><format>%a</format><bogus/></config>").unwrap();

    unsafe {
        std::env::set_var(CONFIG_ENV, &cfg);
    }
    let loaded = load_config();
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
    assert!(loaded.is_err());
}

#[test]
fn whitespace_and_empty_values_are_tolerated() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("config.xml");
    fs::write(
        &cfg,
        "<config>\n  <format>  %z/%b  </format>\n  <path_conversion> Windows </path_conversion>\n  <log_level>verbose</log_level>\n  <log_file></log_file>\n</config>\n",
    )
    .unwrap();

    let xml = load_config_from_xml_path(&cfg).unwrap();
    let mut c = Config::default();
    xml.apply_to(&mut c).unwrap();
    assert_eq!(c.format.as_deref(), Some("%z/%b"));
    assert_eq!(c.path_conversion, PathConversion::WindowsAscii);
    assert_eq!(c.log_level, LogLevel::Info);
    assert_eq!(c.log_file, None::<PathBuf>);
}

#[test]
fn cli_overrides_file_values() {
    use clap::Parser;
    use tagmove::cli::Args;

    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(
        &cfg_path,
        "<config><format>%a/%t</format><path_conversion>utf-8</path_conversion></config>",
    )
    .unwrap();

    let mut c = Config::default();
    load_config_from_xml_path(&cfg_path)
        .unwrap()
        .apply_to(&mut c)
        .unwrap();
    let args = Args::try_parse_from(["tagmove", "--format", "%b/%n", "music"]).unwrap();
    args.apply_overrides(&mut c);

    assert_eq!(c.format.as_deref(), Some("%b/%n"));
    assert_eq!(c.path_conversion, PathConversion::Utf8);
    assert!(c.simulate);
}
