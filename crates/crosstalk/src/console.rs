//! The dispatch console: one command line in, one aggregated printout out.
//!
//! Sending is fire-and-forget; receiving is a single loop bounded by the
//! collection-window deadline — the only suspension point, and it always
//! resumes, with zero replies yielding an empty aggregation rather than
//! an error. One request is outstanding at a time.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::time::{Instant, timeout_at};
use tracing::{debug, trace, warn};

use crosstalk_core::{
    Decoded, DeviceAgent, DuplicatePolicy, LOCAL_LITERAL, PendingCollection, Request, Response,
    TargetSelector, Verb, codec,
};
use crosstalk_net::{MAX_DATAGRAM, NetError, Transport};

/// Tunables the operator controls; both are explicit configuration.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleOptions {
    /// Collection window `T`.
    pub window: Duration,
    pub duplicates: DuplicatePolicy,
}

/// The operator-facing side of the protocol.
///
/// Owns the transport, the placeholder talker device (addressable as
/// `here` locally, and by name from other consoles), and the passively
/// learned peer-address cache used to unicast by-name requests.
pub struct Console<T: Transport> {
    transport: T,
    talker: DeviceAgent,
    options: ConsoleOptions,
    peers: HashMap<String, SocketAddr>,
    /// Port recorded by a `here port <n>`; applied at the next send.
    pending_rebind: Option<u16>,
}

impl<T: Transport> Console<T> {
    pub fn new(transport: T, talker: DeviceAgent, options: ConsoleOptions) -> Self {
        Self {
            transport,
            talker,
            options,
            peers: HashMap::new(),
            pending_rebind: None,
        }
    }

    pub fn talker_name(&self) -> &str {
        self.talker.identity().name()
    }

    pub fn local_port(&self) -> u16 {
        self.transport.local_port()
    }

    /// Send one request and collect replies until the window closes.
    /// Responses come back in arrival order.
    pub async fn dispatch(
        &mut self,
        target: TargetSelector,
        verb: Verb,
    ) -> Result<Vec<Response>, NetError> {
        // A rebind requested by an earlier `here port <n>` applies at the
        // next send — which is now.
        if let Some(port) = self.pending_rebind.take() {
            match self.transport.rebind(port).await {
                Ok(()) => debug!(port, "console rebound"),
                Err(err) => warn!(%err, port, "rebind failed; keeping the old port"),
            }
        }

        let request = Request::new(target, verb, self.talker.identity().clone());

        // The reserved literal addresses our own placeholder, off the wire.
        if matches!(&request.target, TargetSelector::ByName(name) if name == LOCAL_LITERAL) {
            return Ok(self.dispatch_local(request));
        }

        let payload = codec::encode_request(&request);
        let known_peer = match &request.target {
            TargetSelector::ByName(name) => self.peers.get(name).copied(),
            _ => None,
        };
        match known_peer {
            // Flood avoidance: a device we have heard from gets unicast.
            Some(peer) => self.transport.send_to(&payload, peer).await?,
            None => self.transport.broadcast(&payload).await?,
        }

        let deadline = Instant::now() + self.options.window;
        let mut collection =
            PendingCollection::new(request.id, self.options.duplicates, deadline.into_std());
        let mut buf = vec![0u8; MAX_DATAGRAM];
        loop {
            match timeout_at(deadline, self.transport.recv(&mut buf)).await {
                // The window closed; an empty collection is a normal outcome.
                Err(_elapsed) => break,
                Ok(Ok((len, peer))) => {
                    self.handle_datagram(&buf[..len], peer, &mut collection)
                        .await;
                }
                Ok(Err(err)) => {
                    warn!(%err, "receive failed; closing the window early");
                    break;
                }
            }
        }
        debug!(replies = collection.len(), "collection window closed");
        Ok(collection.finish())
    }

    /// `here …`: dispatch straight to the placeholder, no wire involved.
    fn dispatch_local(&mut self, mut request: Request) -> Vec<Response> {
        request.target = TargetSelector::ByName(self.talker.identity().name().to_owned());
        let reaction = self.talker.evaluate(&request);
        if let Some(port) = reaction.rebind {
            self.pending_rebind = Some(port);
        }
        reaction.response.into_iter().collect()
    }

    /// One inbound datagram during an open window: a correlating response
    /// joins the collection; a request from some other console is offered
    /// to the placeholder; everything else is noise.
    async fn handle_datagram(
        &mut self,
        bytes: &[u8],
        peer: SocketAddr,
        collection: &mut PendingCollection,
    ) {
        match codec::decode(bytes) {
            Ok(Decoded::Response(response)) => {
                self.peers.insert(response.from.name().to_owned(), peer);
                collection.offer(response);
            }
            Ok(Decoded::Request(request)) => {
                if request.sender.name() == self.talker.identity().name() {
                    // Our own broadcast echoing back off the medium.
                    return;
                }
                let reaction = self.talker.evaluate(&request);
                if let Some(response) = reaction.response {
                    let payload = codec::encode_response(&response);
                    if let Err(err) = self.transport.send_to(&payload, peer).await {
                        warn!(%err, "failed to answer a peer request");
                    }
                }
                if let Some(port) = reaction.rebind {
                    self.pending_rebind = Some(port);
                }
            }
            Err(err) => trace!(%err, "dropping undecodable datagram"),
        }
    }
}
