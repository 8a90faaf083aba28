//! The console line grammar: `<selector> <verb> [argument…]`.
//!
//! A selector is a device name, a non-negative channel number, or `*`.
//! Bare `talk` and bare `sys` imply `*`. `help`, `history`, and `exit`
//! are local — they never produce a request. Anything malformed is
//! rejected here with a usage message and never reaches the wire.

use thiserror::Error;

use crosstalk_core::{DecodeError, TargetSelector, Verb, VerbWord};

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Send { target: TargetSelector, verb: Verb },
    Help,
    History,
    Exit,
}

/// A line the console refuses locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command '{0}' -- type 'help'")]
    Unknown(String),

    #[error("'{0}' is not something a device answers -- type 'help'")]
    UnknownVerb(String),

    #[error("'{0}' cannot be used as a selector")]
    BadSelector(String),

    #[error("'{verb}' requires {what}")]
    MissingArgument { verb: String, what: &'static str },

    #[error("'{0}' is not an integer")]
    NotAnInteger(String),
}

/// Parse one non-empty line.
pub fn parse_line(line: &str) -> Result<ConsoleCommand, ParseError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => Err(ParseError::Unknown(String::new())),
        ["help"] => Ok(ConsoleCommand::Help),
        ["history"] => Ok(ConsoleCommand::History),
        ["exit" | "quit"] => Ok(ConsoleCommand::Exit),
        // The two identity-flavored verbs broadcast unaddressed.
        ["talk"] => Ok(ConsoleCommand::Send {
            target: TargetSelector::All,
            verb: Verb::Talk,
        }),
        ["sys" | "info"] => Ok(ConsoleCommand::Send {
            target: TargetSelector::All,
            verb: Verb::Sys,
        }),
        [selector, verb_word, args @ ..] => {
            let target = TargetSelector::parse(selector)
                .ok_or_else(|| ParseError::BadSelector((*selector).to_owned()))?;
            let verb = parse_verb(verb_word, args)?;
            Ok(ConsoleCommand::Send { target, verb })
        }
        [word] => Err(ParseError::Unknown((*word).to_owned())),
    }
}

fn parse_verb(word: &str, args: &[&str]) -> Result<Verb, ParseError> {
    let canonical = if word == "info" { "sys" } else { word };
    let verb_word: VerbWord = canonical
        .parse()
        .map_err(|_| ParseError::UnknownVerb(word.to_owned()))?;
    let joined = (!args.is_empty()).then(|| args.join(" "));
    Verb::from_parts(verb_word, joined.as_deref()).map_err(|err| match err {
        DecodeError::MissingArgument { verb } => ParseError::MissingArgument {
            verb: verb.to_owned(),
            what: if verb == "set" {
                "a name and a value"
            } else {
                "a name"
            },
        },
        DecodeError::NonNumericArgument { value, .. } => ParseError::NotAnInteger(value),
        _ => ParseError::UnknownVerb(word.to_owned()),
    })
}

/// The fixed command table `help` prints.
pub fn help_table() -> String {
    [
        "\t[talk]                          Ask every device to introduce itself.",
        "\t[sys]                           Ask every device for its platform.",
        "\t[<device> list]                 List the device's capabilities.",
        "\t[<device> channel]              Show the device's channel.",
        "\t[<device> channel <n>]          Move the device to channel n.",
        "\t[<device> run <what>]           Run the named function.",
        "\t[<device> set <what> <value>]   Set the named variable.",
        "\t[<device> get <what>]           Get the named variable.",
        "\t[<device> port]                 Show the device's listening port.",
        "\t[<device> port <n>]             Re-port the device's next rebind.",
        "\t<device> is a name, a channel number, or '*'; 'here' is this console.",
        "\t[history]                       Show this session's commands.",
        "\t[help]                          Show this table.",
        "\t[exit]                          Leave the console (also Ctrl-D).",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn send(target: TargetSelector, verb: Verb) -> ConsoleCommand {
        ConsoleCommand::Send { target, verb }
    }

    #[test]
    fn bare_talk_and_sys_imply_everyone() {
        assert_eq!(
            parse_line("talk"),
            Ok(send(TargetSelector::All, Verb::Talk))
        );
        assert_eq!(parse_line("sys"), Ok(send(TargetSelector::All, Verb::Sys)));
        assert_eq!(parse_line("info"), Ok(send(TargetSelector::All, Verb::Sys)));
    }

    #[test]
    fn selector_forms() {
        assert_eq!(
            parse_line("Nano talk"),
            Ok(send(TargetSelector::ByName("Nano".into()), Verb::Talk))
        );
        assert_eq!(
            parse_line("11 talk"),
            Ok(send(TargetSelector::ByChannel(11), Verb::Talk))
        );
        assert_eq!(
            parse_line("* list"),
            Ok(send(TargetSelector::All, Verb::List))
        );
        assert_eq!(
            parse_line("here port"),
            Ok(send(TargetSelector::ByName("here".into()), Verb::PortGet))
        );
    }

    #[test]
    fn arguments_reach_the_verb() {
        assert_eq!(
            parse_line("Nano run buzz"),
            Ok(send(
                TargetSelector::ByName("Nano".into()),
                Verb::Run("buzz".into())
            ))
        );
        assert_eq!(
            parse_line("Nano set duration 0.5"),
            Ok(send(
                TargetSelector::ByName("Nano".into()),
                Verb::Set {
                    what: "duration".into(),
                    value: "0.5".into(),
                }
            ))
        );
        assert_eq!(
            parse_line("Nano channel 11"),
            Ok(send(
                TargetSelector::ByName("Nano".into()),
                Verb::ChannelSet(11)
            ))
        );
    }

    #[test]
    fn local_commands_never_build_requests() {
        assert_eq!(parse_line("help"), Ok(ConsoleCommand::Help));
        assert_eq!(parse_line("history"), Ok(ConsoleCommand::History));
        assert_eq!(parse_line("exit"), Ok(ConsoleCommand::Exit));
        assert_eq!(parse_line("quit"), Ok(ConsoleCommand::Exit));
    }

    #[test]
    fn malformed_lines_are_rejected_locally() {
        assert_eq!(
            parse_line("reboot"),
            Err(ParseError::Unknown("reboot".into()))
        );
        assert_eq!(
            parse_line("Nano reboot"),
            Err(ParseError::UnknownVerb("reboot".into()))
        );
        assert_eq!(
            parse_line("Nano run"),
            Err(ParseError::MissingArgument {
                verb: "run".into(),
                what: "a name",
            })
        );
        assert_eq!(
            parse_line("Nano set duration"),
            Err(ParseError::MissingArgument {
                verb: "set".into(),
                what: "a name and a value",
            })
        );
        assert_eq!(
            parse_line("Nano channel eleven"),
            Err(ParseError::NotAnInteger("eleven".into()))
        );
    }
}
