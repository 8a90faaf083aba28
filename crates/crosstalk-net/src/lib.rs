//! The broadcast transport seam for crosstalk.
//!
//! The protocol core never touches a socket; everything network-shaped
//! goes through the [`Transport`] trait. Two implementations ship:
//!
//! - [`UdpTransport`] — the real thing: a UDP socket with
//!   `SO_REUSEADDR` + `SO_BROADCAST` so several participants can share
//!   one host and well-known port.
//! - [`MemoryHub`] / [`MemoryEndpoint`] — an in-process broadcast domain
//!   for tests and demos, faithful to the semantics that matter:
//!   port-scoped delivery, unicast by synthetic address, and no
//!   self-delivery.
//!
//! Receive deadlines are the caller's concern: `recv` is cancel-safe and
//! meant to be wrapped in `tokio::time::timeout_at`.

mod error;
mod memory;
mod udp;

use std::net::SocketAddr;

pub use error::NetError;
pub use memory::{MemoryEndpoint, MemoryHub};
pub use udp::{MAX_DATAGRAM, UdpTransport};

/// One participant's handle onto the shared broadcast medium.
pub trait Transport {
    /// Fire-and-forget broadcast to every participant on the domain.
    fn broadcast(&self, payload: &[u8]) -> impl Future<Output = Result<(), NetError>> + Send;

    /// Fire-and-forget send to one known peer address.
    fn send_to(
        &self,
        payload: &[u8],
        peer: SocketAddr,
    ) -> impl Future<Output = Result<(), NetError>> + Send;

    /// Receive the next datagram into `buf`, yielding its length and the
    /// source address. Cancel-safe: dropping the future loses no data.
    fn recv(
        &mut self,
        buf: &mut [u8],
    ) -> impl Future<Output = Result<(usize, SocketAddr), NetError>> + Send;

    /// Move to a new port. On failure the old binding stays usable.
    fn rebind(&mut self, port: u16) -> impl Future<Output = Result<(), NetError>> + Send;

    /// The port this participant currently listens on.
    fn local_port(&self) -> u16;
}
