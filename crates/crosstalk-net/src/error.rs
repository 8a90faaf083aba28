// ── Transport errors ──

use thiserror::Error;

/// Socket-level failures. Fatal at startup (nothing to listen on),
/// logged and tolerated mid-run — losing a datagram is normal life on a
/// broadcast medium.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("failed to open broadcast socket on port {port}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("send failed")]
    Send(#[source] std::io::Error),

    #[error("receive failed")]
    Recv(#[source] std::io::Error),

    #[error("broadcast domain closed")]
    Closed,
}
