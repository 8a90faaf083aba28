// ── In-process broadcast domain ──
//
// Faithful to the semantics the protocol cares about: delivery is scoped
// to endpoints sharing a port, unicast addresses one endpoint, and a
// sender never hears its own datagrams. Everything else (loss, delay,
// reordering) simply doesn't happen, which is what makes it good for
// tests and demos.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use tokio::sync::broadcast;
use tracing::warn;

use crate::{NetError, Transport};

const HUB_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct Datagram {
    payload: Arc<[u8]>,
    from: SocketAddr,
    /// Destination port for broadcasts.
    port: u16,
    /// `Some` makes this a unicast to exactly that endpoint.
    to: Option<SocketAddr>,
}

/// One shared broadcast domain. Clone it freely; every
/// [`endpoint`](MemoryHub::endpoint) joins the same medium.
#[derive(Clone)]
pub struct MemoryHub {
    tx: broadcast::Sender<Datagram>,
    next_host: Arc<AtomicU16>,
}

impl MemoryHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(HUB_CAPACITY);
        Self {
            tx,
            next_host: Arc::new(AtomicU16::new(1)),
        }
    }

    /// Join the domain on `port` with a fresh synthetic address
    /// (`127.0.x.y:<port>`), unique per endpoint.
    pub fn endpoint(&self, port: u16) -> MemoryEndpoint {
        let seq = self.next_host.fetch_add(1, Ordering::Relaxed);
        let [hi, lo] = seq.to_be_bytes();
        let addr = SocketAddr::from((Ipv4Addr::new(127, 0, hi, lo), port));
        MemoryEndpoint {
            tx: self.tx.clone(),
            rx: self.tx.subscribe(),
            addr,
            port,
        }
    }
}

impl Default for MemoryHub {
    fn default() -> Self {
        Self::new()
    }
}

/// One participant on a [`MemoryHub`].
pub struct MemoryEndpoint {
    tx: broadcast::Sender<Datagram>,
    rx: broadcast::Receiver<Datagram>,
    addr: SocketAddr,
    port: u16,
}

impl MemoryEndpoint {
    /// This endpoint's synthetic address, as peers will see it.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn send(&self, payload: &[u8], to: Option<SocketAddr>) -> Result<(), NetError> {
        let datagram = Datagram {
            payload: payload.into(),
            from: self.addr,
            port: self.port,
            to,
        };
        // A send error only means no endpoint is currently subscribed;
        // on a fire-and-forget medium that is not a failure.
        let _ = self.tx.send(datagram);
        Ok(())
    }
}

impl Transport for MemoryEndpoint {
    async fn broadcast(&self, payload: &[u8]) -> Result<(), NetError> {
        self.send(payload, None)
    }

    async fn send_to(&self, payload: &[u8], peer: SocketAddr) -> Result<(), NetError> {
        self.send(payload, Some(peer))
    }

    async fn recv(&mut self, buf: &mut [u8]) -> Result<(usize, SocketAddr), NetError> {
        loop {
            let datagram = match self.rx.recv().await {
                Ok(datagram) => datagram,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "memory hub receiver lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return Err(NetError::Closed),
            };
            let deliver = match datagram.to {
                Some(peer) => peer == self.addr,
                None => datagram.port == self.port && datagram.from != self.addr,
            };
            if !deliver {
                continue;
            }
            let len = datagram.payload.len().min(buf.len());
            buf[..len].copy_from_slice(&datagram.payload[..len]);
            return Ok((len, datagram.from));
        }
    }

    async fn rebind(&mut self, port: u16) -> Result<(), NetError> {
        self.port = port;
        self.addr.set_port(port);
        self.rx = self.tx.subscribe();
        Ok(())
    }

    fn local_port(&self) -> u16 {
        self.port
    }
}
