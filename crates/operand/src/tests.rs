use std::ffi::OsStr;

use super::*;

fn parse(text: &str) -> RemoteTarget {
    parse_target_as(text, "local").expect("operand parses")
}

#[test]
fn parses_user_host_and_path() {
    let target = parse("alice@example.com:/home/alice/file.txt");
    assert_eq!(target.user(), "alice");
    assert_eq!(target.host(), "example.com");
    assert_eq!(target.path(), "/home/alice/file.txt");
}

#[test]
fn host_and_path_use_default_user() {
    let target = parse("example.com:relative/path");
    assert_eq!(target.user(), "local");
    assert_eq!(target.host(), "example.com");
    assert_eq!(target.path(), "relative/path");
}

#[test]
fn bare_host_has_empty_path_and_is_local() {
    let target = parse("example.com");
    assert_eq!(target.user(), "local");
    assert_eq!(target.host(), "example.com");
    assert_eq!(target.path(), "");
    assert!(!is_remote(OsStr::new("example.com")));
}

#[test]
fn user_and_host_without_path() {
    let target = parse("bob@jump-box");
    assert_eq!(target.user(), "bob");
    assert_eq!(target.host(), "jump-box");
    assert_eq!(target.path(), "");
}

#[test]
fn trailing_colon_means_remote_home() {
    let target = parse("host:");
    assert_eq!(target.host(), "host");
    assert_eq!(target.path(), "");
    assert!(is_remote(OsStr::new("host:")));
}

#[test]
fn path_may_contain_colons_and_at_signs() {
    let target = parse("user@host:/path/with:colon/and@symbol");
    assert_eq!(target.user(), "user");
    assert_eq!(target.host(), "host");
    assert_eq!(target.path(), "/path/with:colon/and@symbol");
}

#[test]
fn bracketed_ipv6_with_user() {
    let target = parse("bob@[2001:db8::1]:/remote/dir/");
    assert_eq!(target.user(), "bob");
    assert_eq!(target.host(), "2001:db8::1");
    assert_eq!(target.path(), "/remote/dir/");
}

#[test]
fn bracketed_ipv6_without_path() {
    let target = parse("[::1]");
    assert_eq!(target.host(), "::1");
    assert_eq!(target.path(), "");
}

#[test]
fn rejects_empty_operand() {
    assert_eq!(parse_target_as("", "local"), Err(OperandError::Empty));
    assert_eq!(parse_target(""), Err(OperandError::Empty));
}

#[test]
fn rejects_missing_host() {
    assert!(matches!(
        parse_target_as(":/path", "local"),
        Err(OperandError::MissingHost(_))
    ));
    assert!(matches!(
        parse_target_as("user@", "local"),
        Err(OperandError::MissingHost(_))
    ));
}

#[test]
fn rejects_empty_user() {
    assert!(matches!(
        parse_target_as("@host:/path", "local"),
        Err(OperandError::EmptyUser(_))
    ));
}

#[test]
fn rejects_unclosed_bracket() {
    assert!(matches!(
        parse_target_as("[::1:/path", "local"),
        Err(OperandError::InvalidBrackets(_))
    ));
    assert!(matches!(
        parse_target_as("[::1]junk", "local"),
        Err(OperandError::InvalidBrackets(_))
    ));
}

#[test]
fn display_round_trips_through_parser() {
    let target = RemoteTarget::new("ops", "::1", "/srv");
    assert_eq!(target.to_string(), "ops@[::1]:/srv");
    assert_eq!(parse(&target.to_string()), target);

    let bare = RemoteTarget::new("ops", "db01", "");
    assert_eq!(bare.to_string(), "ops@db01");
}

#[test]
fn with_user_replaces_login() {
    let target = parse("db01:/srv").with_user("backup");
    assert_eq!(target.user(), "backup");
}

#[test]
fn remote_classification() {
    assert!(is_remote(OsStr::new("host:/path")));
    assert!(is_remote(OsStr::new("user@host:/path")));
    assert!(is_remote(OsStr::new("user@[::1]:/path")));
    assert!(!is_remote(OsStr::new("/tmp/file.txt")));
    assert!(!is_remote(OsStr::new("relative/path")));
    assert!(!is_remote(OsStr::new("./dir:name/file")));
    assert!(!is_remote(OsStr::new("/path/to:file")));
}

#[test]
fn drive_letters_and_extended_prefixes_are_local() {
    assert!(!is_remote(OsStr::new("C:\\Users\\ops\\file.txt")));
    assert!(!is_remote(OsStr::new("d:relative")));
    assert!(!is_remote(OsStr::new(r"\\?\C:\data")));
    assert!(!is_remote(OsStr::new(r"\\.\pipe\name")));
    assert!(!is_remote(OsStr::new("dir\\sub:file")));
}

#[test]
fn home_relative_paths() {
    assert_eq!(home_relative("~"), "");
    assert_eq!(home_relative("~/sub"), "sub");
    assert_eq!(home_relative("~/"), "");
    assert_eq!(home_relative("/abs/path"), "/abs/path");
    assert_eq!(home_relative("~other/x"), "~other/x");
}

#[test]
fn domain_prefix_is_stripped() {
    assert_eq!(strip_domain("CORP\\alice"), "alice");
    assert_eq!(strip_domain("alice"), "alice");
}

#[test]
fn explicit_user_only_counts_before_the_host() {
    assert_eq!(explicit_user("ops@db01:logs"), Some("ops"));
    assert_eq!(explicit_user("db01:/tmp/a@b"), None);
    assert_eq!(explicit_user("db01"), None);
    assert_eq!(explicit_user("root@[::1]:/srv"), Some("root"));
}

#[test]
fn brackets_in_the_path_do_not_move_the_host() {
    let target = parse("db01:logs/a@b[1].txt");
    assert_eq!(target.user(), "local");
    assert_eq!(target.host(), "db01");
    assert_eq!(target.path(), "logs/a@b[1].txt");

    let target = parse("ops@db01:logs/[ab]*.log");
    assert_eq!(target.user(), "ops");
    assert_eq!(target.host(), "db01");
    assert_eq!(target.path(), "logs/[ab]*.log");
    assert_eq!(explicit_user("db01:x@y[0]"), None);
}
