//! Configuration layering: command line over project file over defaults
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use mindmap_history::config::{Args, Command, Config, PROJECT_CONFIG_FILE};
use mindmap_history::export::ExportFormat;
use mindmap_history::history::OverflowPolicy;

const PROJECT_TOML: &str = r#"
[history]
limit = 10
overflow = "freeze-window"

[autosave]
debounce_ms = 250
dir = "/var/lib/maps"
"#;

fn project_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join(PROJECT_CONFIG_FILE), PROJECT_TOML).expect("write project config");
    dir
}

#[test]
fn test_project_file_is_discovered() {
    let dir = project_dir();
    let args = Args::parse_from(["mindmap", "tree", "folders.json"]);
    let config = Config::from_args_in(&args, dir.path()).unwrap();

    assert!(config.has_project_config());
    assert_eq!(config.history_limit, 10);
    assert_eq!(config.overflow, OverflowPolicy::FreezeWindow);
    assert_eq!(config.autosave_debounce, Duration::from_millis(250));
    assert_eq!(config.autosave_dir, Some(PathBuf::from("/var/lib/maps")));

    let history = config.history_manager();
    assert_eq!(history.limit(), 10);
    assert_eq!(history.overflow_policy(), OverflowPolicy::FreezeWindow);
}

#[test]
fn test_command_line_overrides_project_file() {
    let dir = project_dir();
    let args = Args::parse_from([
        "mindmap",
        "replay",
        "map.json",
        "edits.jsonl",
        "--history-limit",
        "3",
        "--debounce-ms",
        "5",
        "--autosave-dir",
        "/tmp/elsewhere",
        "--log-level",
        "debug",
    ]);
    let config = Config::from_args_in(&args, dir.path()).unwrap();

    assert_eq!(config.history_limit, 3);
    assert_eq!(config.overflow, OverflowPolicy::FreezeWindow);
    assert_eq!(config.autosave_debounce, Duration::from_millis(5));
    assert_eq!(config.autosave_dir, Some(PathBuf::from("/tmp/elsewhere")));
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_explicit_config_path() {
    let project = project_dir();
    let elsewhere = tempfile::tempdir().unwrap();
    let path = project.path().join(PROJECT_CONFIG_FILE);

    let args = Args::parse_from(["mindmap", "--config", path.to_str().unwrap(), "new", "m1"]);
    let config = Config::from_args_in(&args, elsewhere.path()).unwrap();

    assert_eq!(config.project_config_path, Some(path));
    assert_eq!(config.history_limit, 10);
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let args = Args::parse_from(["mindmap", "--config", missing.to_str().unwrap(), "new", "m1"]);

    assert!(Config::from_args_in(&args, dir.path()).is_err());
}

#[test]
fn test_invalid_project_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(PROJECT_CONFIG_FILE), "[history]\nlimit = \"many\"\n").unwrap();
    let args = Args::parse_from(["mindmap", "tree", "folders.json"]);

    let err = Config::from_args_in(&args, dir.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config file"));
}

#[test]
fn test_export_subcommand_arguments() {
    let args = Args::parse_from(["mindmap", "export", "map.json", "--format", "md", "-o", "out"]);
    match args.command {
        Command::Export { map, format, output } => {
            assert_eq!(map, PathBuf::from("map.json"));
            assert_eq!(format, ExportFormat::Markdown);
            assert_eq!(output, Some(PathBuf::from("out")));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}
