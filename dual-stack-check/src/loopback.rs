use eyre::Result;
use log::debug;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::{
    io::{self, ErrorKind, Write},
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, TcpStream},
    os::fd::AsFd,
};

use crate::configure::Config;
use crate::listener::{self, Listener};
use crate::serve::Accept;

/// `[::1]` and `127.0.0.1` on the same port behind one acceptor. Still one
/// connection at a time: `accept` waits on both sockets with `poll(2)` and
/// takes a single connection from whichever is ready.
pub struct LoopbackListener {
    listeners: [Listener; 2],
}

impl LoopbackListener {
    /// Binds the IPv6 side first, so port 0 picks one port and the IPv4 side
    /// reuses it.
    pub fn bind<W: Write>(config: &Config, out: &mut W) -> Result<Self> {
        let v6_config = Config {
            address: Ipv6Addr::LOCALHOST,
            ..*config
        };
        let v6 = Listener::bind(&v6_config, out)?;
        let port = v6.local_addr()?.port();
        let v4 = Listener::bind_v4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port), config.backlog)?;
        Ok(Self {
            listeners: [v6, v4],
        })
    }

    pub fn local_addrs(&self) -> io::Result<Vec<SocketAddr>> {
        self.listeners.iter().map(Listener::local_addr).collect()
    }

    pub fn write_banner<W: Write>(&self, out: &mut W) -> io::Result<()> {
        listener::write_banner(out, &self.local_addrs()?)
    }
}

impl Accept for LoopbackListener {
    type Stream = TcpStream;

    fn accept(&self) -> io::Result<(TcpStream, SocketAddr)> {
        let mut fds: Vec<PollFd> = self
            .listeners
            .iter()
            .map(|listener| PollFd::new(listener.as_fd(), PollFlags::POLLIN))
            .collect();
        poll(&mut fds, PollTimeout::NONE)?;

        let ready = fds.iter().position(|fd| {
            fd.revents()
                .map_or(false, |events| !events.is_empty())
        });
        match ready {
            Some(i) => {
                debug!("listener {} is ready", i);
                self.listeners[i].accept()
            }
            None => Err(io::Error::new(
                ErrorKind::Other,
                "poll returned without a ready listener",
            )),
        }
    }
}
