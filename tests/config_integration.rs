use std::path::PathBuf;

use markpad::config::{
    ConfigFlags, ThemeMode, load_config_flags, parse_flag_tokens, save_config_flags,
};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markpadrc");
    let content = r"
# comment
--no-persist

--theme light

--autosave-secs=15
--render-debug-log=render.log
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.no_persist);
    assert_eq!(flags.theme, Some(ThemeMode::Light));
    assert_eq!(flags.autosave_secs, Some(15));
    assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markpadrc");
    let content = "--perf\n--theme light\n--export-dir exports\n--autosave-secs 60\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "markpad".to_string(),
        "--theme".to_string(),
        "dark".to_string(),
        "--storage".to_string(),
        "draft.json".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.perf, "file flags should remain enabled");
    assert_eq!(effective.theme, Some(ThemeMode::Dark), "cli should override theme");
    assert_eq!(effective.storage, Some(PathBuf::from("draft.json")));
    assert_eq!(
        effective.export_dir,
        Some(PathBuf::from("exports")),
        "file config should be preserved when CLI does not override"
    );
    assert_eq!(effective.autosave_secs, Some(60));
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "markpad".to_string(),
        "--theme=dark".to_string(),
        "--log-file=markpad.log".to_string(),
        "--export-dir=out".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.theme, Some(ThemeMode::Dark));
    assert_eq!(flags.log_file, Some(PathBuf::from("markpad.log")));
    assert_eq!(flags.export_dir, Some(PathBuf::from("out")));
}

#[test]
fn test_local_override_wins_over_global() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("global").join("config");
    let local = dir.path().join(".markpadrc");
    save_config_flags(
        &global,
        &ConfigFlags {
            theme: Some(ThemeMode::Light),
            autosave_secs: Some(30),
            ..ConfigFlags::default()
        },
    )
    .unwrap();
    std::fs::write(&local, "--autosave-secs 5\n").unwrap();

    let merged = load_config_flags(&global)
        .unwrap()
        .union(&load_config_flags(&local).unwrap());
    assert_eq!(merged.theme, Some(ThemeMode::Light));
    assert_eq!(merged.autosave_secs, Some(5));
}

#[test]
fn test_missing_config_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}
