use log::debug;
use std::{
    io::{self, Read, Write},
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream},
    time::Duration,
};

pub const TIMEOUT: Duration = Duration::from_secs(5);

const REQUEST: &[u8] = b"GET / HTTP/1.0\r\n\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    pub fn loopback(self, port: u16) -> SocketAddr {
        match self {
            Family::V4 => SocketAddr::from((Ipv4Addr::LOCALHOST, port)),
            Family::V6 => SocketAddr::from((Ipv6Addr::LOCALHOST, port)),
        }
    }
}

/// Sends a minimal request to `addr` and returns everything read until EOF.
pub fn fetch(addr: SocketAddr, timeout: Duration) -> io::Result<Vec<u8>> {
    let mut conn = TcpStream::connect_timeout(&addr, timeout)?;
    conn.set_read_timeout(Some(timeout))?;
    conn.set_write_timeout(Some(timeout))?;
    debug!("connected to {} from {}", addr, conn.local_addr()?);

    conn.write_all(REQUEST)?;
    let mut response = Vec::new();
    conn.read_to_end(&mut response)?;
    Ok(response)
}

/// Probes one loopback family and renders the report line for it.
pub fn check(family: Family, port: u16, timeout: Duration) -> (bool, String) {
    let addr = family.loopback(port);
    match fetch(addr, timeout) {
        Ok(response) => {
            let status = String::from_utf8_lossy(&response)
                .lines()
                .next()
                .unwrap_or_default()
                .to_owned();
            (true, format!("{:?} {}: ok ({})", family, addr, status))
        }
        Err(e) => (false, format!("{:?} {}: failed ({})", family, addr, e)),
    }
}
