use clap::{command, value_parser, Arg, ArgAction, Command};

pub fn register_args() -> Command {
    command!() // requires `cargo` feature
        .next_line_help(true)
        .arg(
            Arg::new("v6only")
                .required(false)
                .long("v6only")
                .action(ArgAction::SetTrue)
                .help("Keep IPV6_V6ONLY enabled, so IPv4 clients are refused"),
        )
        .arg(
            Arg::new("ipv4_loopback")
                .required(false)
                .long("ipv4-loopback")
                .action(ArgAction::SetTrue)
                .help("Also listen on 127.0.0.1 with a separate IPv4 socket"),
        )
}

pub fn register_probe_args() -> Command {
    Command::new("dual-stack-probe")
        .version(clap::crate_version!())
        .about("Connects to the listener over IPv4 and IPv6 loopback")
        .next_line_help(true)
        .arg(
            Arg::new("port")
                .required(false)
                .default_value("8080")
                .long("port")
                .action(ArgAction::Set)
                .value_parser(value_parser!(u16))
                .help("The port the listener is bound to"),
        )
}
