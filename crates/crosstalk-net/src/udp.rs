// ── UDP broadcast transport ──

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::{NetError, Transport};

/// Largest datagram we will receive. Protocol messages are tiny; this is
/// just a comfortable receive-buffer size.
pub const MAX_DATAGRAM: usize = 4096;

/// A UDP socket on the shared broadcast domain.
///
/// Bound to `0.0.0.0:<port>` with `SO_REUSEADDR` and `SO_BROADCAST` set
/// before the bind — several participants (a console and a handful of
/// device daemons, say) routinely share one host and one port.
pub struct UdpTransport {
    socket: UdpSocket,
    port: u16,
}

impl UdpTransport {
    /// Open the broadcast socket on `port`.
    pub fn bind(port: u16) -> Result<Self, NetError> {
        let socket = open_broadcast_socket(port).map_err(|source| NetError::Bind { port, source })?;
        info!(port, "broadcast socket open");
        Ok(Self { socket, port })
    }
}

fn open_broadcast_socket(port: u16) -> io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_broadcast(true)?;
    socket.set_nonblocking(true)?;
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    socket.bind(&addr.into())?;
    UdpSocket::from_std(socket.into())
}

impl Transport for UdpTransport {
    async fn broadcast(&self, payload: &[u8]) -> Result<(), NetError> {
        self.socket
            .send_to(payload, (Ipv4Addr::BROADCAST, self.port))
            .await
            .map_err(NetError::Send)?;
        Ok(())
    }

    async fn send_to(&self, payload: &[u8], peer: SocketAddr) -> Result<(), NetError> {
        self.socket
            .send_to(payload, peer)
            .await
            .map_err(NetError::Send)?;
        Ok(())
    }

    async fn recv(&mut self, buf: &mut [u8]) -> Result<(usize, SocketAddr), NetError> {
        self.socket.recv_from(buf).await.map_err(NetError::Recv)
    }

    /// Open the new socket first; only a successful bind replaces the old
    /// one, so a failed rebind leaves the previous binding intact.
    async fn rebind(&mut self, port: u16) -> Result<(), NetError> {
        let socket = open_broadcast_socket(port).map_err(|source| NetError::Bind { port, source })?;
        debug!(old = self.port, new = port, "rebinding broadcast socket");
        self.socket = socket;
        self.port = port;
        Ok(())
    }

    fn local_port(&self) -> u16 {
        self.port
    }
}
