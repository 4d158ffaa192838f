use std::ffi::OsStr;

use operand::{is_remote, parse_target_as};
use proptest::prelude::*;

fn user() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.-]{0,15}"
}

fn host() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{0,30}"
}

fn path() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./:@~*?\\[\\]-]{0,40}"
}

proptest! {
    #[test]
    fn user_host_path_components_survive_parsing(user in user(), host in host(), path in path()) {
        let text = format!("{user}@{host}:{path}");
        let target = parse_target_as(&text, "fallback").expect("well-formed operand");
        prop_assert_eq!(target.user(), user.as_str());
        prop_assert_eq!(target.host(), host.as_str());
        prop_assert_eq!(target.path(), path.as_str());
        prop_assert!(is_remote(OsStr::new(&text)));
    }

    #[test]
    fn missing_user_falls_back(host in host(), path in path()) {
        let text = format!("{host}:{path}");
        let target = parse_target_as(&text, "fallback").expect("well-formed operand");
        prop_assert_eq!(target.user(), "fallback");
        prop_assert_eq!(target.host(), host.as_str());
        prop_assert_eq!(target.path(), path.as_str());
    }

    #[test]
    fn bare_hosts_are_local_with_empty_path(host in host()) {
        let target = parse_target_as(&host, "fallback").expect("bare host");
        prop_assert_eq!(target.path(), "");
        prop_assert!(!is_remote(OsStr::new(&host)));
    }

    #[test]
    fn absolute_local_paths_are_never_remote(path in "/[a-zA-Z0-9_./:-]{0,40}") {
        prop_assert!(!is_remote(OsStr::new(&path)));
    }
}
