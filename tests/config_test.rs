//! Integration tests for Settings config loading with layered precedence.
//!
//! Precedence: defaults → global → local `.rwire.toml` → `RWIRE_*` env vars.
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.
//! Environment overrides live in `config_env_test.rs` (own process).

use std::fs;
use std::rc::Rc;

use tempfile::TempDir;

use rwire::config::{local_config_path, Settings};
use rwire::{Arguments, Function, Param, Registry, Value};

mod common;

// ============================================================
// Settings::load() local config merge tests
// ============================================================

#[test]
fn given_no_config_files_when_load_then_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings, Settings::default());
}

#[test]
fn given_partial_local_config_when_load_then_only_given_fields_change() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let local = r#"
[resolution]
default_method = "run"
freeze_on_resolve = false
"#;
    fs::write(local_config_path(dir.path()), local).unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.resolution.default_method, "run");
    assert!(!settings.resolution.freeze_on_resolve);
    assert_eq!(settings.resolution.method_separator, "::", "kept default");
    assert_eq!(settings.resolution.reference_marker, "$", "kept default");
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "[resolution\nbroken").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().starts_with("config error: parse"), "{err}");
}

#[test]
fn given_empty_separator_in_local_config_when_load_then_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "[resolution]\nqualifier_separator = \"\"\n",
    )
    .unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().contains("resolution.qualifier_separator"));
}

// ============================================================
// Settings flowing into a registry
// ============================================================

#[test]
fn given_custom_syntax_when_resolving_then_registry_uses_it() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let local = r##"
[resolution]
reference_marker = "@"
qualifier_separator = "#"
method_separator = "."
default_method = "run"
"##;
    fs::write(local_config_path(dir.path()), local).unwrap();
    let settings = Settings::load(Some(dir.path())).unwrap();
    let di = Registry::new(Rc::new(common::catalog())).with_options(settings.resolution);
    di.set("Engine", "V8").unwrap();
    di.set("Engine#right", "Turbine").unwrap();
    di.set("paint", "silver").unwrap();

    // Act
    let w16 = common::instance(di.make("W16", Arguments::new()));
    let car = common::car(di.make("Car", Arguments::new().named("color", "@paint")));
    let greeting = di.invoke("V8.call", Arguments::new().arg("Hi "));

    // Assert
    let w16 = w16.downcast_ref::<common::W16>().unwrap();
    assert_eq!(w16.right.class(), "Turbine");
    assert_eq!(car.color, "silver");
    assert_eq!(greeting, Ok(Value::from("Hi World")));
}

#[test]
fn given_custom_default_method_when_invoking_name_then_that_method_runs() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "[resolution]\ndefault_method = \"describe\"\n",
    )
    .unwrap();
    let settings = Settings::load(Some(dir.path())).unwrap();
    let di = Registry::new(Rc::new(common::catalog())).with_options(settings.resolution);
    di.set("Engine", "V8").unwrap();
    di.set("Car", Arguments::new()).unwrap();
    di.set(
        "painter",
        Function::new(vec![Param::new("color").with_default("grey")], |args| {
            Ok(args.into_iter().next().unwrap_or_default())
        }),
    )
    .unwrap();

    assert_eq!(di.invoke("Car", Arguments::new()), Ok(Value::from("red car")));
    assert_eq!(di.invoke("painter", Arguments::new()), Ok(Value::from("grey")));
}

#[test]
fn given_template_when_written_as_local_config_then_loads_as_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), Settings::template()).unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();

    assert_eq!(settings, Settings::default());
}
