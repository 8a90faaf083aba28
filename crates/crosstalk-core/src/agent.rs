// ── Device agent ──
//
// One agent per device, pure and synchronous: Idle → Evaluating →
// (Executing | Rejecting) → Idle, one datagram at a time. The agent never
// touches a socket; drivers (the device daemon, the console's placeholder,
// tests) feed it datagrams and apply the resulting Reaction. That keeps
// channel/port mutation trivially sequential per device and makes every
// protocol branch testable without I/O.

use tracing::{debug, trace};

use crate::codec::{self, Decoded};
use crate::error::{ERR_INVALID_CHANNEL, ERR_INVALID_PORT, ERR_UNKNOWN_FUNCTION};
use crate::message::{Request, Response, ResultValue, Verb};
use crate::model::{Identity, Manifesto};
use crate::registry::{Capabilities, CapabilityRegistry};
use crate::resolve;

/// What the driver must do after the agent observed a datagram: send the
/// response, if any, and only then apply the rebind, if any — an in-flight
/// response always goes out on the prior binding.
#[derive(Debug, Default)]
pub struct Reaction {
    pub response: Option<Response>,
    pub rebind: Option<u16>,
}

impl Reaction {
    fn none() -> Self {
        Self::default()
    }
}

/// A device: identity, manifesto, capability table, and the mutable
/// network config (channel lives in the identity, port here).
pub struct DeviceAgent {
    identity: Identity,
    manifesto: Manifesto,
    registry: CapabilityRegistry,
    /// The configured listening port. A `port <n>` updates this
    /// immediately; the socket follows at the next rebind.
    port: u16,
}

impl DeviceAgent {
    pub fn new(identity: Identity, capabilities: Capabilities, port: u16) -> Self {
        Self {
            identity,
            manifesto: capabilities.manifesto,
            registry: capabilities.registry,
            port,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn manifesto(&self) -> &Manifesto {
        &self.manifesto
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Feed one raw datagram. Undecodable payloads and responses (devices
    /// only answer requests) are dropped silently — broadcast noise is
    /// expected, not exceptional.
    pub fn observe(&mut self, datagram: &[u8]) -> Reaction {
        match codec::decode(datagram) {
            Ok(Decoded::Request(request)) => self.evaluate(&request),
            Ok(Decoded::Response(_)) => {
                trace!(device = %self.identity, "ignoring response datagram");
                Reaction::none()
            }
            Err(err) => {
                trace!(device = %self.identity, %err, "dropping undecodable datagram");
                Reaction::none()
            }
        }
    }

    /// Evaluate an already-decoded request against this device.
    pub fn evaluate(&mut self, request: &Request) -> Reaction {
        if !resolve::resolves(&request.target, &self.identity) {
            trace!(
                device = %self.identity,
                target = %request.target,
                "rejecting: not addressed to us",
            );
            return Reaction::none();
        }

        debug!(device = %self.identity, verb = ?request.verb, "executing");
        let (result, rebind) = self.execute(&request.verb);
        Reaction {
            response: Some(Response {
                id: request.id,
                from: self.identity.clone(),
                verb: request.verb.clone(),
                result,
            }),
            rebind,
        }
    }

    fn execute(&mut self, verb: &Verb) -> (ResultValue, Option<u16>) {
        match verb {
            Verb::Talk => (
                ResultValue::Text(self.manifesto.description().to_owned()),
                None,
            ),
            Verb::List => (ResultValue::Entries(self.manifesto.entries()), None),
            Verb::Sys => (
                ResultValue::Text(self.manifesto.platform().to_owned()),
                None,
            ),
            Verb::ChannelGet => (ResultValue::Text(self.identity.channel().to_string()), None),
            Verb::ChannelSet(raw) => match u32::try_from(*raw) {
                Ok(channel) => {
                    self.identity.set_channel(channel);
                    (ResultValue::Text(channel.to_string()), None)
                }
                Err(_) => (ResultValue::Error(ERR_INVALID_CHANNEL.to_owned()), None),
            },
            Verb::Run(what) => match self.registry.run(what) {
                Some(handler) => {
                    // Fire-and-acknowledge: the ack reports dispatch, not
                    // the action's real-world outcome.
                    handler();
                    (ResultValue::Ack, None)
                }
                None => (ResultValue::Error(ERR_UNKNOWN_FUNCTION.to_owned()), None),
            },
            Verb::Set { what, value } => match self.registry.set(what) {
                Some(handler) => match handler(value) {
                    // Never echo the written value.
                    Ok(()) => (ResultValue::Ack, None),
                    Err(reason) => (ResultValue::Error(reason), None),
                },
                None => (ResultValue::Error(ERR_UNKNOWN_FUNCTION.to_owned()), None),
            },
            Verb::Get(what) => match self.registry.get(what) {
                Some(handler) => (ResultValue::Text(handler()), None),
                None => (ResultValue::Error(ERR_UNKNOWN_FUNCTION.to_owned()), None),
            },
            Verb::PortGet => (ResultValue::Text(self.port.to_string()), None),
            Verb::PortSet(raw) => match u16::try_from(*raw).ok().filter(|port| *port != 0) {
                Some(port) => {
                    self.port = port;
                    (ResultValue::Text(port.to_string()), Some(port))
                }
                None => (ResultValue::Error(ERR_INVALID_PORT.to_owned()), None),
            },
        }
    }
}
