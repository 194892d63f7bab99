use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Endpoint already bound to {0}")]
    AlreadyBound(SocketAddr),

    #[error("Endpoint must be bound before connecting")]
    NotBound,

    #[error("Peer {0} is unreachable")]
    Unreachable(SocketAddr),

    #[error("Endpoint is closed")]
    Closed,
}

pub type ConnectionResult<T> = Result<T, ConnectionError>;
