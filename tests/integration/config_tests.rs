use clap::Parser;
use dupemgr::cli::{Cli, Commands, ScanArgs};
use dupemgr::config::Config;
use dupemgr::duplicates::CancelCheckpoints;
use dupemgr::scan_walker_config;
use figment::Jail;
use std::path::Path;

fn scan_args(extra: &[&str]) -> ScanArgs {
    let argv = ["dupemgr", "scan", "/data"].iter().chain(extra);
    match Cli::try_parse_from(argv).unwrap().command {
        Commands::Scan(args) => args,
        other => panic!("expected scan, got {other:?}"),
    }
}

#[test]
fn test_file_and_environment_layers() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "dupemgr.toml",
            r#"
                extensions = [".jpg"]
                include_others = false
                excluded_dirs = ["node_modules"]
                cancel_checkpoints = "traversal-and-hashing"
            "#,
        )?;
        jail.set_env("DUPEMGR_PROGRESS", "false");
        jail.set_env("DUPEMGR_INCLUDE_OTHERS", "true");

        let config = Config::load(Some(Path::new("dupemgr.toml"))).unwrap();

        assert_eq!(config.extensions, vec![".jpg".to_string()]);
        assert!(config.include_others);
        assert!(!config.progress);
        assert_eq!(config.excluded_dirs, vec!["node_modules".to_string()]);
        assert_eq!(config.cancel_checkpoints, CancelCheckpoints::TraversalAndHashing);
        Ok(())
    });
}

#[test]
fn test_cli_allow_list_replaces_configured_one() {
    Jail::expect_with(|jail| {
        jail.create_file("dupemgr.toml", "extensions = [\".jpg\"]\ninclude_others = true\n")?;
        let config = Config::load(Some(Path::new("dupemgr.toml"))).unwrap();

        let walker = scan_walker_config(&scan_args(&["--ext", "TXT"]), &config);
        assert!(walker.extensions.contains(".txt"));
        assert!(!walker.extensions.contains(".jpg"));
        assert!(!walker.include_others);
        assert!(walker.accepts_file(Path::new("/d/a.txt")));
        assert!(!walker.accepts_file(Path::new("/d/a.jpg")));

        let walker = scan_walker_config(&scan_args(&["--ext", "txt", "--include-others"]), &config);
        assert!(walker.accepts_file(Path::new("/d/a.jpg")));
        Ok(())
    });
}

#[test]
fn test_cli_without_filters_keeps_configured_allow_list() {
    Jail::expect_with(|jail| {
        jail.create_file("dupemgr.toml", "extensions = [\"png\"]\ninclude_others = false\n")?;
        let config = Config::load(Some(Path::new("dupemgr.toml"))).unwrap();

        let walker = scan_walker_config(&scan_args(&["-x", "build"]), &config);
        assert!(walker.accepts_file(Path::new("/d/a.png")));
        assert!(!walker.accepts_file(Path::new("/d/a.txt")));
        assert!(walker.is_excluded_dir("build"));
        assert!(walker.is_excluded_dir("Lib"));

        let walker = scan_walker_config(&scan_args(&["--include-others"]), &config);
        assert!(walker.accepts_file(Path::new("/d/a.txt")));
        Ok(())
    });
}

#[test]
fn test_malformed_file_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_file("dupemgr.toml", "include_others = \"sometimes\"\n")?;
        assert!(Config::load(Some(Path::new("dupemgr.toml"))).is_err());
        Ok(())
    });
}

#[test]
fn test_rendered_config_loads_back() {
    Jail::expect_with(|jail| {
        let mut config = Config::default();
        config.extensions = vec![".mp3".to_string()];
        config.include_others = false;
        jail.create_file("round.toml", &config.to_toml().unwrap())?;

        assert_eq!(Config::load(Some(Path::new("round.toml"))).unwrap(), config);
        Ok(())
    });
}
