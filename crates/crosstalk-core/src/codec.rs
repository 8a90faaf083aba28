// ── Wire codec ──
//
// One compact JSON object per datagram, UTF-8.
//
// Request keys:  target, verb, [arg], sender, channel, id
// Response keys: from, channel, verb, [arg], id, and exactly one of
//                result (string, or entry array for `list`) or error.
//
// Unknown additional keys are ignored for forward compatibility.
// Encoding is total. Decoding validates shape, verb, and arguments;
// anything else on the medium is noise and comes back as a DecodeError
// for the caller to drop.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;
use crate::message::{ACK_LITERAL, Request, Response, ResultValue, Verb, VerbWord};
use crate::model::{Identity, ManifestoEntry, TargetSelector};

/// A classified inbound datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Request(Request),
    Response(Response),
}

// ── Wire shapes ─────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct RequestWire {
    target: String,
    verb: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arg: Option<String>,
    sender: String,
    #[serde(default)]
    channel: u32,
    #[serde(default)]
    id: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResponseWire {
    from: String,
    #[serde(default)]
    channel: u32,
    verb: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arg: Option<String>,
    #[serde(default)]
    id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<ResultWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ResultWire {
    Text(String),
    Entries(Vec<ManifestoEntry>),
}

// ── Encoding (total) ────────────────────────────────────────────────

pub fn encode_request(request: &Request) -> Vec<u8> {
    let wire = RequestWire {
        target: request.target.to_string(),
        verb: request.verb.word().to_string(),
        arg: request.verb.arg(),
        sender: request.sender.name().to_owned(),
        channel: request.sender.channel(),
        id: request.id,
    };
    serde_json::to_vec(&wire).expect("wire structs always serialize")
}

pub fn encode_response(response: &Response) -> Vec<u8> {
    let (result, error) = match &response.result {
        ResultValue::Ack => (Some(ResultWire::Text(ACK_LITERAL.to_owned())), None),
        ResultValue::Text(text) => (Some(ResultWire::Text(text.clone())), None),
        ResultValue::Entries(entries) => (Some(ResultWire::Entries(entries.clone())), None),
        ResultValue::Error(reason) => (None, Some(reason.clone())),
    };
    let wire = ResponseWire {
        from: response.from.name().to_owned(),
        channel: response.from.channel(),
        verb: response.verb.word().to_string(),
        arg: response.verb.arg(),
        id: response.id,
        result,
        error,
    };
    serde_json::to_vec(&wire).expect("wire structs always serialize")
}

// ── Decoding ────────────────────────────────────────────────────────

/// Decode and classify one datagram.
///
/// Requests and responses share the medium; they are told apart by shape
/// (`target` vs `from`). Anything that is not a well-formed object of one
/// of the two shapes fails here and is dropped by the caller.
pub fn decode(bytes: &[u8]) -> Result<Decoded, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(DecodeError::UnknownShape);
    }
    if value.get("target").is_some() {
        decode_request(value).map(Decoded::Request)
    } else if value.get("from").is_some() {
        decode_response(value).map(Decoded::Response)
    } else {
        Err(DecodeError::UnknownShape)
    }
}

fn decode_request(value: Value) -> Result<Request, DecodeError> {
    let wire: RequestWire = serde_json::from_value(value)?;
    let target = TargetSelector::parse(&wire.target)
        .ok_or_else(|| DecodeError::InvalidTarget(wire.target.clone()))?;
    let verb = decode_verb(&wire.verb, wire.arg.as_deref())?;
    let sender = Identity::new(wire.sender, wire.channel)?;
    Ok(Request {
        id: wire.id,
        target,
        verb,
        sender,
    })
}

fn decode_response(value: Value) -> Result<Response, DecodeError> {
    let wire: ResponseWire = serde_json::from_value(value)?;
    let from = Identity::new(wire.from, wire.channel)?;
    let verb = decode_verb(&wire.verb, wire.arg.as_deref())?;
    let result = match (wire.error, wire.result) {
        (Some(reason), _) => ResultValue::Error(reason),
        (None, Some(ResultWire::Text(text))) => {
            // The ack literal is reserved: it always reads back as Ack.
            if text == ACK_LITERAL {
                ResultValue::Ack
            } else {
                ResultValue::Text(text)
            }
        }
        (None, Some(ResultWire::Entries(entries))) => ResultValue::Entries(entries),
        (None, None) => return Err(DecodeError::UnknownShape),
    };
    Ok(Response {
        id: wire.id,
        from,
        verb,
        result,
    })
}

fn decode_verb(word: &str, arg: Option<&str>) -> Result<Verb, DecodeError> {
    let word: VerbWord = word
        .parse()
        .map_err(|_| DecodeError::UnknownVerb(word.to_owned()))?;
    Verb::from_parts(word, arg)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::CapabilityKind;

    fn identity(name: &str, channel: u32) -> Identity {
        Identity::new(name, channel).unwrap()
    }

    fn request(target: TargetSelector, verb: Verb) -> Request {
        Request {
            id: 7,
            target,
            verb,
            sender: identity("Talker-ab", 0),
        }
    }

    #[test]
    fn requests_round_trip() {
        let cases = [
            request(TargetSelector::All, Verb::Talk),
            request(TargetSelector::ByChannel(11), Verb::List),
            request(TargetSelector::ByName("Nano".into()), Verb::ChannelGet),
            request(TargetSelector::ByName("Nano".into()), Verb::ChannelSet(11)),
            request(TargetSelector::ByName("Nano".into()), Verb::Run("buzz".into())),
            request(
                TargetSelector::ByName("Nano".into()),
                Verb::Set {
                    what: "duration".into(),
                    value: "0.5".into(),
                },
            ),
            request(TargetSelector::ByName("Nano".into()), Verb::Get("duration".into())),
            request(TargetSelector::All, Verb::Sys),
            request(TargetSelector::ByName("Nano".into()), Verb::PortGet),
            request(TargetSelector::ByName("Nano".into()), Verb::PortSet(5006)),
        ];
        for original in cases {
            let decoded = decode(&encode_request(&original)).unwrap();
            assert_eq!(decoded, Decoded::Request(original));
        }
    }

    #[test]
    fn responses_round_trip() {
        let entries = vec![ManifestoEntry {
            kind: CapabilityKind::Run,
            name: "buzz".into(),
            description: "Buzz once".into(),
        }];
        let cases = [
            (Verb::Run("buzz".into()), ResultValue::Ack),
            (Verb::Talk, ResultValue::Text("A buzzer".into())),
            (
                Verb::Run("nope".into()),
                ResultValue::Error("unknown function".into()),
            ),
            (Verb::List, ResultValue::Entries(entries)),
        ];
        for (verb, result) in cases {
            let original = Response {
                id: 9,
                from: identity("Nano", 3),
                verb,
                result,
            };
            let decoded = decode(&encode_response(&original)).unwrap();
            assert_eq!(decoded, Decoded::Response(original));
        }
    }

    #[test]
    fn responder_channel_survives_the_wire() {
        let original = Response {
            id: 1,
            from: identity("Nano", 42),
            verb: Verb::ChannelGet,
            result: ResultValue::Text("42".into()),
        };
        let Decoded::Response(decoded) = decode(&encode_response(&original)).unwrap() else {
            panic!("expected a response");
        };
        assert_eq!(decoded.from.channel(), 42);
    }

    #[test]
    fn garbage_never_decodes() {
        let cases: &[&[u8]] = &[
            b"",
            b"\xff\xfe garbage",
            b"not json at all",
            b"42",
            b"[1,2,3]",
            b"\"a string\"",
            b"{}",
            b"{\"unrelated\":true}",
        ];
        for bytes in cases {
            assert!(decode(bytes).is_err(), "decoded {bytes:?}");
        }
    }

    #[test]
    fn unknown_verbs_are_refused() {
        let bytes = br#"{"target":"*","verb":"reboot","sender":"Talker-ab"}"#;
        assert!(matches!(
            decode(bytes),
            Err(DecodeError::UnknownVerb(word)) if word == "reboot"
        ));
    }

    #[test]
    fn missing_required_argument_is_refused() {
        let bytes = br#"{"target":"Nano","verb":"run","sender":"Talker-ab"}"#;
        assert!(matches!(
            decode(bytes),
            Err(DecodeError::MissingArgument { verb: "run" })
        ));
    }

    #[test]
    fn non_numeric_channel_argument_is_refused() {
        let bytes = br#"{"target":"Nano","verb":"channel","arg":"eleven","sender":"Talker-ab"}"#;
        assert!(matches!(
            decode(bytes),
            Err(DecodeError::NonNumericArgument { verb: "channel", .. })
        ));
    }

    #[test]
    fn unknown_extra_fields_are_ignored() {
        let bytes =
            br#"{"target":"*","verb":"talk","sender":"Talker-ab","hops":3,"via":"relay-1"}"#;
        let Decoded::Request(request) = decode(bytes).unwrap() else {
            panic!("expected a request");
        };
        assert_eq!(request.verb, Verb::Talk);
        assert_eq!(request.target, TargetSelector::All);
    }

    #[test]
    fn missing_channel_and_id_default_to_zero() {
        let bytes = br#"{"target":"Nano","verb":"talk","sender":"Talker-ab"}"#;
        let Decoded::Request(request) = decode(bytes).unwrap() else {
            panic!("expected a request");
        };
        assert_eq!(request.id, 0);
        assert_eq!(request.sender.channel(), 0);
    }

    #[test]
    fn roger_text_reads_back_as_ack() {
        let bytes = br#"{"from":"Nano","verb":"run","arg":"buzz","result":"ROGER"}"#;
        let Decoded::Response(response) = decode(bytes).unwrap() else {
            panic!("expected a response");
        };
        assert_eq!(response.result, ResultValue::Ack);
    }

    #[test]
    fn response_without_result_or_error_is_refused() {
        let bytes = br#"{"from":"Nano","verb":"talk"}"#;
        assert!(matches!(decode(bytes), Err(DecodeError::UnknownShape)));
    }
}
