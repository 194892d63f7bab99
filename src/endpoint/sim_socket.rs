use crate::endpoint::error::{ConnectionError, ConnectionResult};
use crate::endpoint::ConnectionEndpoint;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;

/// Payloads handed to a socket and not yet picked up by the link.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    queue: Arc<Mutex<VecDeque<Bytes>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, payload: Bytes) {
        self.queue.lock().push_back(payload);
    }

    /// Take every queued payload in send order.
    pub fn drain(&self) -> Vec<Bytes> {
        self.queue.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketState {
    Unbound,
    Bound,
    Connected(SocketAddr),
    Closed,
}

/// In-memory endpoint whose sends land in an [`Outbox`] shared with the
/// simulated link.
#[derive(Debug)]
pub struct SimSocket {
    local_addr: SocketAddr,
    listener: SocketAddr,
    state: SocketState,
    outbox: Outbox,
    payloads_sent: u64,
    bytes_sent: u64,
}

impl SimSocket {
    /// `listener` is the only address that accepts connections.
    pub fn new(local_addr: SocketAddr, listener: SocketAddr, outbox: Outbox) -> Self {
        Self {
            local_addr,
            listener,
            state: SocketState::Unbound,
            outbox,
            payloads_sent: 0,
            bytes_sent: 0,
        }
    }

    pub fn state(&self) -> SocketState {
        self.state
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn payloads_sent(&self) -> u64 {
        self.payloads_sent
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}

impl ConnectionEndpoint for SimSocket {
    fn bind(&mut self) -> ConnectionResult<()> {
        match self.state {
            SocketState::Unbound => {
                self.state = SocketState::Bound;
                Ok(())
            }
            SocketState::Closed => Err(ConnectionError::Closed),
            _ => Err(ConnectionError::AlreadyBound(self.local_addr)),
        }
    }

    fn connect(&mut self, peer: SocketAddr) -> ConnectionResult<()> {
        match self.state {
            SocketState::Bound if peer == self.listener => {
                self.state = SocketState::Connected(peer);
                tracing::debug!("{} connected to {}", self.local_addr, peer);
                Ok(())
            }
            SocketState::Bound => Err(ConnectionError::Unreachable(peer)),
            SocketState::Closed => Err(ConnectionError::Closed),
            _ => Err(ConnectionError::NotBound),
        }
    }

    fn send(&mut self, payload: Bytes) {
        if !matches!(self.state, SocketState::Connected(_)) {
            tracing::warn!(
                "Dropping {} byte send on {:?} socket {}",
                payload.len(),
                self.state,
                self.local_addr
            );
            return;
        }

        self.payloads_sent += 1;
        self.bytes_sent += payload.len() as u64;
        self.outbox.push(payload);
    }

    fn close(&mut self) {
        if self.state != SocketState::Closed {
            tracing::debug!("Closing socket {}", self.local_addr);
            self.state = SocketState::Closed;
        }
    }

    fn is_open(&self) -> bool {
        matches!(self.state, SocketState::Bound | SocketState::Connected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addrs() -> (SocketAddr, SocketAddr) {
        (
            "10.1.1.1:49153".parse().unwrap(),
            "10.1.1.2:8080".parse().unwrap(),
        )
    }

    #[test]
    fn test_bind_connect_send() {
        let (local, peer) = addrs();
        let outbox = Outbox::new();
        let mut socket = SimSocket::new(local, peer, outbox.clone());

        socket.bind().unwrap();
        socket.connect(peer).unwrap();
        assert!(socket.is_open());

        socket.send(Bytes::from_static(&[0u8; 100]));
        socket.send(Bytes::from_static(&[0u8; 50]));

        assert_eq!(socket.payloads_sent(), 2);
        assert_eq!(socket.bytes_sent(), 150);
        let drained = outbox.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].len(), 100);
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_connect_requires_bind() {
        let (local, peer) = addrs();
        let mut socket = SimSocket::new(local, peer, Outbox::new());
        assert_eq!(socket.connect(peer), Err(ConnectionError::NotBound));
    }

    #[test]
    fn test_connect_to_wrong_peer_is_unreachable() {
        let (local, peer) = addrs();
        let other: SocketAddr = "10.9.9.9:80".parse().unwrap();
        let mut socket = SimSocket::new(local, peer, Outbox::new());
        socket.bind().unwrap();
        assert_eq!(socket.connect(other), Err(ConnectionError::Unreachable(other)));
    }

    #[test]
    fn test_double_bind_fails() {
        let (local, peer) = addrs();
        let mut socket = SimSocket::new(local, peer, Outbox::new());
        socket.bind().unwrap();
        assert_eq!(socket.bind(), Err(ConnectionError::AlreadyBound(local)));
    }

    #[test]
    fn test_send_after_close_is_dropped() {
        let (local, peer) = addrs();
        let outbox = Outbox::new();
        let mut socket = SimSocket::new(local, peer, outbox.clone());
        socket.bind().unwrap();
        socket.connect(peer).unwrap();
        socket.close();

        socket.send(Bytes::from_static(b"late"));
        assert!(!socket.is_open());
        assert!(outbox.is_empty());
        assert_eq!(socket.bind(), Err(ConnectionError::Closed));
    }
}
