use clap::ArgMatches;
use std::net::{Ipv6Addr, SocketAddrV6};

pub const PORT: u16 = 8080;
pub const BACKLOG: i32 = 3;

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub address: Ipv6Addr,
    pub port: u16,
    pub backlog: i32,
    pub v6only: bool,
    /// Also listen on `127.0.0.1` through a second socket.
    pub ipv4_loopback: bool,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddrV6 {
        SocketAddrV6::new(self.address, self.port, 0, 0)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: Ipv6Addr::LOCALHOST,
            port: PORT,
            backlog: BACKLOG,
            v6only: false,
            ipv4_loopback: false,
        }
    }
}

impl From<ArgMatches> for Config {
    fn from(matches: ArgMatches) -> Self {
        Self {
            v6only: matches.get_flag("v6only"),
            ipv4_loopback: matches.get_flag("ipv4_loopback"),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmdline;

    #[test]
    fn fixed_defaults() {
        let config = Config::from(cmdline::register_args().get_matches_from(["dual-stack-check"]));
        assert_eq!(Ipv6Addr::LOCALHOST, config.address);
        assert_eq!(8080, config.port);
        assert_eq!(3, config.backlog);
        assert!(!config.v6only);
        assert!(!config.ipv4_loopback);
        assert_eq!("[::1]:8080", config.socket_addr().to_string());
    }

    #[test]
    fn v6only_flag() {
        let matches = cmdline::register_args().get_matches_from(["dual-stack-check", "--v6only"]);
        let config = Config::from(matches);
        assert!(config.v6only);
        assert_eq!(8080, config.port);
    }

    #[test]
    fn ipv4_loopback_flag() {
        let matches =
            cmdline::register_args().get_matches_from(["dual-stack-check", "--ipv4-loopback"]);
        let config = Config::from(matches);
        assert!(config.ipv4_loopback);
        assert!(!config.v6only);
        assert_eq!(Ipv6Addr::LOCALHOST, config.address);
    }
}
