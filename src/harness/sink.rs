use std::net::SocketAddr;

/// Receiving application that only counts what arrives.
#[derive(Debug)]
pub struct PacketSink {
    listen_addr: SocketAddr,
    total_rx: u64,
    packets_rx: u64,
}

impl PacketSink {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            total_rx: 0,
            packets_rx: 0,
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }

    pub fn receive(&mut self, bytes: usize) {
        self.total_rx += bytes as u64;
        self.packets_rx += 1;
    }

    /// Total payload bytes received.
    pub fn total_rx(&self) -> u64 {
        self.total_rx
    }

    pub fn packets_rx(&self) -> u64 {
        self.packets_rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_counts_bytes() {
        let mut sink = PacketSink::new("10.1.1.2:8080".parse().unwrap());
        sink.receive(1500);
        sink.receive(40);
        assert_eq!(sink.total_rx(), 1540);
        assert_eq!(sink.packets_rx(), 2);
        assert_eq!(sink.listen_addr().port(), 8080);
    }
}
