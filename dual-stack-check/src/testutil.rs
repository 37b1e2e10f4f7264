use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    io::{self, ErrorKind, Read, Write},
    net::{IpAddr, Ipv6Addr, SocketAddr, TcpListener},
    rc::Rc,
};

use crate::serve::Accept;

/// Containers without an IPv6 loopback can't run the socket tests.
pub fn ipv6_loopback_available() -> bool {
    TcpListener::bind("[::1]:0").is_ok()
}

pub const MOCK_PEER: SocketAddr =
    SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 40000);

pub type Written = Rc<RefCell<Vec<u8>>>;

/// In-memory connection: reads from `input`, records what was written.
pub struct MockStream {
    input: io::Cursor<Vec<u8>>,
    written: Written,
    pub fail_read: bool,
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_read {
            return Err(io::Error::from(ErrorKind::ConnectionReset));
        }
        self.input.read(buf)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The stream keeps one clone of `Written`, so a strong count of 1 means the
/// connection was dropped.
pub fn mock_stream(input: &[u8]) -> (MockStream, Written) {
    let written = Rc::new(RefCell::new(Vec::new()));
    let stream = MockStream {
        input: io::Cursor::new(input.to_vec()),
        written: written.clone(),
        fail_read: false,
    };
    (stream, written)
}

/// Hands out queued results in order, counting accept calls.
pub struct MockAcceptor {
    queue: RefCell<VecDeque<io::Result<(MockStream, SocketAddr)>>>,
    pub calls: Cell<usize>,
}

impl MockAcceptor {
    pub fn new(queue: Vec<io::Result<MockStream>>) -> Self {
        Self::with_peers(
            queue
                .into_iter()
                .map(|result| result.map(|stream| (stream, MOCK_PEER)))
                .collect(),
        )
    }

    pub fn with_peers(queue: Vec<io::Result<(MockStream, SocketAddr)>>) -> Self {
        Self {
            queue: RefCell::new(queue.into()),
            calls: Cell::new(0),
        }
    }
}

impl Accept for MockAcceptor {
    type Stream = MockStream;

    fn accept(&self) -> io::Result<(MockStream, SocketAddr)> {
        self.calls.set(self.calls.get() + 1);
        match self.queue.borrow_mut().pop_front() {
            Some(result) => result,
            None => Err(io::Error::from(ErrorKind::WouldBlock)),
        }
    }
}
