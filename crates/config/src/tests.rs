use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::*;
use crate::paths::config_home_from;

fn pinned() -> Overrides {
    Overrides {
        ssh_key_path: Some(PathBuf::from("/keys/flag")),
        known_hosts: Some(PathBuf::from("/stores/flag")),
        ..Overrides::default()
    }
}

#[test]
fn xdg_config_home_wins_when_set() {
    assert_eq!(
        config_home_from(Some(OsString::from("/xdg"))),
        Some(PathBuf::from("/xdg"))
    );
    assert_eq!(config_home_from(Some(OsString::new())), dirs::config_dir());
    assert_eq!(config_home_from(None), dirs::config_dir());
}

#[test]
fn absolute_and_user_relative_paths_are_left_alone() {
    for path in ["/etc/zssh/key", "relative/key", "~other/key"] {
        assert_eq!(
            expand_home(Path::new(path)).expect("expand"),
            PathBuf::from(path)
        );
    }
}

#[test]
fn tilde_expands_to_the_home_directory() {
    let Some(home) = dirs::home_dir() else {
        return;
    };
    assert_eq!(expand_home(Path::new("~")).expect("expand"), home);
    assert_eq!(
        expand_home(Path::new("~/.ssh/id_ed25519")).expect("expand"),
        home.join(".ssh/id_ed25519")
    );
}

#[test]
fn flags_beat_profile_values() {
    let profile = Profile {
        ssh_key_path: Some(PathBuf::from("/keys/profile")),
        service: Some("profile-svc".to_owned()),
        connect_timeout_secs: Some(5),
        ..Profile::default()
    };
    let overrides = Overrides {
        service: Some("flag-svc".to_owned()),
        connect_timeout_secs: Some(9),
        ..pinned()
    };
    let settings = Settings::resolve(&overrides, Some(&profile)).expect("resolve");
    assert_eq!(settings.ssh_key_path(), Path::new("/keys/flag"));
    assert_eq!(settings.service(), "flag-svc");
    assert_eq!(settings.connect_timeout(), Some(Duration::from_secs(9)));
}

#[test]
fn profile_values_beat_defaults() {
    let profile = Profile {
        user: Some("ops".to_owned()),
        service: Some("db-ssh".to_owned()),
        proxy_command: Some("overlay-tunnel %s %i".to_owned()),
        debug: Some(true),
        ..Profile::default()
    };
    let settings = Settings::resolve(&pinned(), Some(&profile)).expect("resolve");
    assert_eq!(settings.user(), Some("ops"));
    assert_eq!(settings.service(), "db-ssh");
    assert_eq!(settings.proxy_command(), Some("overlay-tunnel %s %i"));
    assert!(settings.debug());
}

#[test]
fn defaults_fill_the_gaps() {
    let settings = Settings::resolve(&pinned(), None).expect("resolve");
    assert_eq!(settings.user(), None);
    assert_eq!(settings.service(), DEFAULT_SERVICE);
    assert_eq!(settings.proxy_command(), None);
    assert_eq!(
        settings.connect_timeout(),
        Some(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
    );
    assert!(!settings.debug());
}

#[test]
fn zero_timeout_disables_it() {
    let overrides = Overrides {
        connect_timeout_secs: Some(0),
        ..pinned()
    };
    let settings = Settings::resolve(&overrides, None).expect("resolve");
    assert_eq!(settings.connect_timeout(), None);
}

#[test]
fn blank_proxy_command_means_direct_dial() {
    let overrides = Overrides {
        proxy_command: Some("   ".to_owned()),
        ..pinned()
    };
    let settings = Settings::resolve(&overrides, None).expect("resolve");
    assert_eq!(settings.proxy_command(), None);
}

#[test]
fn empty_file_holds_no_profiles() {
    let map = ProfileMap::parse(Path::new("config.json"), "  \n").expect("parse");
    assert!(map.is_empty());
}

#[test]
fn unknown_fields_are_ignored() {
    let map = ProfileMap::parse(
        Path::new("config.json"),
        r#"{"db01": {"service": "db", "oidc": {"enabled": false}}}"#,
    )
    .expect("parse");
    assert_eq!(map.len(), 1);
    assert_eq!(
        map.get("db01").and_then(|profile| profile.service.as_deref()),
        Some("db")
    );
}
