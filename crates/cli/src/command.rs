//! crates/cli/src/command.rs
//! Argument definitions for both binaries.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser, value_parser};

pub(crate) const ZSSH: &str = "zssh";
pub(crate) const ZSCP: &str = "zscp";

pub(crate) fn zssh_command() -> Command {
    common_arguments(
        Command::new(ZSSH)
            .version(env!("CARGO_PKG_VERSION"))
            .about("Open a shell or run a command on a host reached through the overlay")
            .arg_required_else_help(true),
    )
    .arg(
        Arg::new("target")
            .value_name("[USER@]TARGET")
            .help("Target identity, optionally prefixed with the login user")
            .required(true),
    )
    .arg(
        Arg::new("command")
            .value_name("COMMAND")
            .help("Command to run instead of an interactive shell")
            .num_args(1..)
            .trailing_var_arg(true)
            .allow_hyphen_values(true),
    )
}

pub(crate) fn zscp_command() -> Command {
    common_arguments(
        Command::new(ZSCP)
            .version(env!("CARGO_PKG_VERSION"))
            .about("Copy files to or from a host reached through the overlay")
            .after_help(
                "Exactly one side must be remote ([USER@]TARGET:PATH). Copies from a \
                 remote host take one source; copies to it accept several.",
            )
            .arg_required_else_help(true),
    )
    .arg(
        Arg::new("recursive")
            .long("recursive")
            .short('r')
            .help("Copy directories and their contents")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("fail-fast")
            .long("fail-fast")
            .help("Stop at the first file that fails to copy")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("operands")
            .value_name("SOURCE")
            .help("Sources followed by the destination")
            .num_args(2..)
            .required(true)
            .value_parser(OsStringValueParser::new()),
    )
}

fn common_arguments(command: Command) -> Command {
    command
        .arg(
            Arg::new("ssh-key-path")
                .long("ssh-key-path")
                .short('i')
                .value_name("PATH")
                .help("Private key file [default: ~/.ssh/id_rsa]")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("service")
                .long("service")
                .short('s')
                .value_name("NAME")
                .help("Overlay service to dial [default: zssh]"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .short('d')
                .help("Log debug detail to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("known-hosts")
                .long("known-hosts")
                .value_name("PATH")
                .help("Host key store [default: <config dir>/zssh/known_hosts]")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("proxy-command")
                .long("proxy-command")
                .value_name("COMMAND")
                .help("Dial through COMMAND's stdin/stdout; %s is the service, %i the target"),
        )
        .arg(
            Arg::new("connect-timeout")
                .long("connect-timeout")
                .value_name("SECONDS")
                .help("Dial and handshake limit; 0 waits indefinitely [default: 30]")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("token-file")
                .long("token-file")
                .value_name("PATH")
                .help("Read the overlay bearer token from PATH instead of ZSSH_BEARER_TOKEN")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Profile file [default: <config dir>/zssh/config.json]")
                .value_parser(value_parser!(PathBuf)),
        )
}
