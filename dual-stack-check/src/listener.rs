use eyre::{Result, WrapErr};
use log::{debug, error};
use nix::sys::socket::{
    bind, getsockopt, listen, setsockopt, socket, sockopt, AddressFamily, Backlog, SockFlag,
    SockType, SockaddrIn, SockaddrIn6, SockaddrLike,
};
use std::{
    io::{self, Write},
    net::{SocketAddr, SocketAddrV4, TcpListener, TcpStream},
    os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd},
};

use crate::configure::Config;
use crate::serve::Accept;

/// Listening IPv6 socket. Dropping it closes the descriptor.
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Creates, configures, binds and listens, in that order.
    ///
    /// The `IPV6_V6ONLY` readback is written to `out` right after the option
    /// is set, before binding. A failed readback is logged and ignored.
    pub fn bind<W: Write>(config: &Config, out: &mut W) -> Result<Self> {
        let fd = socket(
            AddressFamily::Inet6,
            SockType::Stream,
            SockFlag::empty(),
            None,
        )
        .wrap_err("socket failed")?;

        setsockopt(&fd, sockopt::ReuseAddr, &true)
            .wrap_err("setsockopt SO_REUSEADDR failed")?;

        setsockopt(&fd, sockopt::Ipv6V6Only, &config.v6only)
            .wrap_err("setsockopt IPV6_V6ONLY failed")?;
        match getsockopt(&fd, sockopt::Ipv6V6Only) {
            Ok(v6only) => {
                writeln!(out, "IPV6_V6ONLY is currently set to: {}", v6only as i32)?;
            }
            Err(e) => error!("getsockopt IPV6_V6ONLY failed: {}", e),
        }

        Self::bind_and_listen(
            fd,
            &SockaddrIn6::from(config.socket_addr()),
            config.backlog,
        )
    }

    /// Plain IPv4 listener, used next to the IPv6 one when both loopbacks
    /// are served.
    pub fn bind_v4(addr: SocketAddrV4, backlog: i32) -> Result<Self> {
        let fd = socket(
            AddressFamily::Inet,
            SockType::Stream,
            SockFlag::empty(),
            None,
        )
        .wrap_err("socket failed")?;

        setsockopt(&fd, sockopt::ReuseAddr, &true)
            .wrap_err("setsockopt SO_REUSEADDR failed")?;

        Self::bind_and_listen(fd, &SockaddrIn::from(addr), backlog)
    }

    fn bind_and_listen(fd: OwnedFd, addr: &dyn SockaddrLike, backlog: i32) -> Result<Self> {
        bind(fd.as_raw_fd(), addr).wrap_err("bind failed")?;

        let backlog_len = Backlog::new(backlog).wrap_err("invalid backlog")?;
        listen(&fd, backlog_len).wrap_err("listen failed")?;

        let listener = Self::from(fd);
        debug!("listening on {:?} with backlog {}", listener.local_addr(), backlog);
        Ok(listener)
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    pub fn write_banner<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_banner(out, &[self.local_addr()?])
    }
}

/// Startup banner: one line per bound address, then the `curl` invocations
/// for both families. The port is taken from the first address.
pub fn write_banner<W: Write>(out: &mut W, addrs: &[SocketAddr]) -> io::Result<()> {
    for addr in addrs {
        let host = match addr {
            SocketAddr::V6(v6) => format!("[{}]", v6.ip()),
            SocketAddr::V4(v4) => v4.ip().to_string(),
        };
        writeln!(out, "Server listening on {} port {}", host, addr.port())?;
    }
    let port = addrs.first().map_or(0, SocketAddr::port);
    writeln!(out, "Test with curl: ")?;
    writeln!(out, "  curl -6 http://[::1]:{}", port)?;
    writeln!(out, "  curl -4 http://127.0.0.1:{}\n", port)?;
    out.flush()
}

impl From<OwnedFd> for Listener {
    fn from(fd: OwnedFd) -> Self {
        Self {
            inner: TcpListener::from(fd),
        }
    }
}

impl AsFd for Listener {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.inner.as_fd()
    }
}

impl Accept for Listener {
    type Stream = TcpStream;

    fn accept(&self) -> io::Result<(TcpStream, SocketAddr)> {
        self.inner.accept()
    }
}
