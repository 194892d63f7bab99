//! Connection endpoint contract used by traffic sources.
//!
//! `send` is fire-and-forget: the caller never learns whether the payload
//! was delivered.

mod error;
mod sim_socket;

pub use error::{ConnectionError, ConnectionResult};
pub use sim_socket::{Outbox, SimSocket, SocketState};

use bytes::Bytes;
use std::net::SocketAddr;

pub trait ConnectionEndpoint {
    fn bind(&mut self) -> ConnectionResult<()>;

    fn connect(&mut self, peer: SocketAddr) -> ConnectionResult<()>;

    /// Queue a payload for transmission without blocking.
    fn send(&mut self, payload: Bytes);

    fn close(&mut self);

    fn is_open(&self) -> bool;
}
