use log::{debug, error};
use std::{
    fmt,
    io::{self, Read, Write},
    net::{SocketAddr, TcpListener, TcpStream},
};

pub const BUFFER_SIZE: usize = 1024;

/// Sent verbatim to every client, whatever it asked for.
pub const HTTP_RESPONSE: &[u8] =
    b"HTTP/1.1 200 OK\nContent-Type: text/plain\nContent-Length: 14\n\nHello, world!\n";

pub trait Accept {
    type Stream: Read + Write;

    fn accept(&self) -> io::Result<(Self::Stream, SocketAddr)>;
}

impl Accept for TcpListener {
    type Stream = TcpStream;

    fn accept(&self) -> io::Result<(TcpStream, SocketAddr)> {
        TcpListener::accept(self)
    }
}

/// Sequential accept-serve loop. One connection is read, answered and closed
/// before the next accept.
pub struct Server<A, W> {
    acceptor: A,
    out: W,
}

impl<A: Accept, W: Write> Server<A, W> {
    pub fn new(acceptor: A, out: W) -> Self {
        Self { acceptor, out }
    }

    /// Runs `limit` passes of the loop, or forever with `None`. A failed
    /// accept counts as a pass.
    pub fn serve(&mut self, limit: Option<usize>) {
        let mut remaining = limit;
        while remaining != Some(0) {
            if let Err(e) = self.serve_one() {
                error!("accept failed: {}", e);
            }
            if let Some(n) = remaining.as_mut() {
                *n -= 1;
            }
        }
    }

    /// Accepts a single connection and services it. Only the accept error is
    /// returned, read and write failures are not surfaced.
    pub fn serve_one(&mut self) -> io::Result<SocketAddr> {
        let (mut conn, peer) = self.acceptor.accept()?;
        self.report(format_args!("Accepted connection from {}\n", peer));

        let mut buffer = [0u8; BUFFER_SIZE];
        let len = conn.read(&mut buffer).unwrap_or_else(|e| {
            debug!("read from {} failed: {}", peer, e);
            0
        });
        self.dump(&buffer[..len]);

        if let Err(e) = conn.write(HTTP_RESPONSE) {
            debug!("write to {} failed: {}", peer, e);
        }

        Ok(peer)
    }

    fn dump(&mut self, request: &[u8]) {
        self.report(format_args!(
            "Request received:\n---\n{}\n---\n",
            String::from_utf8_lossy(request)
        ));
    }

    /// Operator output is best effort, a broken stdout never stops the loop.
    fn report(&mut self, line: fmt::Arguments) {
        let written = self.out.write_fmt(line).and_then(|_| self.out.flush());
        if let Err(e) = written {
            debug!("writing operator output failed: {}", e);
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
