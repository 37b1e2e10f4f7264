use log::warn;
use std::{
    error::Error,
    fmt::{self, Display},
    io::{self, ErrorKind},
    net::{IpAddr, SocketAddr},
};

use crate::serve::Accept;

#[derive(Debug)]
pub struct Blocked(pub SocketAddr);

impl Display for Blocked {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "blocked remote addr {}", self.0)
    }
}

impl Error for Blocked {}

/// IPv4-mapped peers count as IPv4, so `::ffff:127.0.0.1` is loopback.
pub fn is_loopback(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback(),
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map_or(v6.is_loopback(), |v4| v4.is_loopback()),
    }
}

/// Closes connections from non-loopback peers and reports them as a failed
/// accept.
pub struct Firewall<A> {
    inner: A,
}

impl<A> Firewall<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

impl<A: Accept> Accept for Firewall<A> {
    type Stream = A::Stream;

    fn accept(&self) -> io::Result<(A::Stream, SocketAddr)> {
        let (stream, peer) = self.inner.accept()?;
        if !is_loopback(peer.ip()) {
            drop(stream);
            warn!("closed connection from non-loopback peer {}", peer);
            return Err(io::Error::new(ErrorKind::PermissionDenied, Blocked(peer)));
        }
        Ok((stream, peer))
    }
}
