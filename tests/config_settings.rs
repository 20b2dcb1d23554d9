use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tempfile::TempDir;

use watchrun::cli::CliArgs;
use watchrun::config::{load_from_path, Settings};

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(dir: &TempDir, contents: &str) -> Result<PathBuf, std::io::Error> {
    let path = dir.path().join("Watchrun.toml");
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn config_file_round_trips() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
[watch]
dirs = ["src", "templates"]
include = '\.go$'

[run]
command = ["go", "run", "."]
"#,
    )?;

    let cfg = load_from_path(&path)?;
    assert_eq!(cfg.watch.dirs, vec![PathBuf::from("src"), PathBuf::from("templates")]);
    assert_eq!(cfg.watch.include.as_deref(), Some(r"\.go$"));
    assert_eq!(cfg.watch.exclude, None);
    assert_eq!(cfg.run.command, vec!["go", "run", "."]);
    Ok(())
}

#[test]
fn empty_sections_are_allowed() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "")?;

    let cfg = load_from_path(&path)?;
    assert!(cfg.watch.dirs.is_empty());
    assert!(cfg.run.command.is_empty());
    Ok(())
}

#[test]
fn malformed_toml_is_an_error() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "[watch\ndirs = 3")?;
    assert!(load_from_path(&path).is_err());
    Ok(())
}

#[test]
fn cli_flags_override_the_config_file() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
[watch]
dirs = ["from-config"]
include = 'config-include'
exclude = 'config-exclude'

[run]
command = ["config-cmd"]
"#,
    )?;
    let cfg = load_from_path(&path)?;

    let args = CliArgs::parse_from([
        "watchrun",
        "-d",
        "from-cli",
        "--include",
        "cli-include",
        "echo",
        "hi",
    ]);

    let settings = Settings::merge(&args, Some(cfg))?;
    assert_eq!(settings.dirs, vec![PathBuf::from("from-cli")]);
    assert_eq!(settings.include.as_deref(), Some("cli-include"));
    // Not set on the CLI, so the config value survives.
    assert_eq!(settings.exclude.as_deref(), Some("config-exclude"));
    assert_eq!(settings.command, vec!["echo", "hi"]);
    Ok(())
}

#[test]
fn dirs_default_to_the_current_directory() -> TestResult {
    let args = CliArgs::parse_from(["watchrun", "echo", "hi"]);
    let settings = Settings::merge(&args, None)?;
    assert_eq!(settings.dirs, vec![PathBuf::from(".")]);
    Ok(())
}

#[test]
fn a_missing_command_is_rejected() {
    let args = CliArgs::parse_from(["watchrun"]);
    assert!(Settings::merge(&args, None).is_err());
}

#[test]
fn config_file_can_supply_the_command() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "[run]\ncommand = [\"make\", \"serve\"]\n")?;
    let cfg = load_from_path(&path)?;

    let args = CliArgs::parse_from(["watchrun"]);
    let settings = Settings::merge(&args, Some(cfg))?;
    assert_eq!(settings.command, vec!["make", "serve"]);
    Ok(())
}
