//! The interactive loop: read a line, dispatch, render, repeat.
//!
//! One command is outstanding at a time — the prompt only returns once
//! the collection window has closed, so `exit` can never interrupt an
//! in-flight collection.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use crosstalk_net::Transport;

use crate::console::Console;
use crate::error::CliError;
use crate::output::{self, RenderOptions};
use crate::parse::{self, ConsoleCommand, ParseError};

/// Run the console interactively until `exit` or EOF (Ctrl-D).
pub async fn run<T: Transport>(
    console: &mut Console<T>,
    render: RenderOptions,
) -> Result<(), CliError> {
    println!(
        "\t[{}] listening on port {}. Type 'help' for commands, 'exit' to leave.",
        console.talker_name(),
        console.local_port()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut history: Vec<String> = Vec::new();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            // EOF: drain nothing, leave quietly.
            println!();
            break;
        };
        let line = line.trim().to_owned();
        if line.is_empty() {
            continue;
        }
        history.push(line.clone());

        match parse::parse_line(&line) {
            Ok(ConsoleCommand::Exit) => break,
            Ok(ConsoleCommand::Help) => println!("{}", parse::help_table()),
            Ok(ConsoleCommand::History) => {
                for (index, entry) in history.iter().enumerate() {
                    println!("\t{}: {entry}", index + 1);
                }
            }
            Ok(ConsoleCommand::Send { target, verb }) => {
                // A send failure mid-session is not fatal; the medium may
                // come back for the next command.
                match console.dispatch(target, verb).await {
                    Ok(responses) => {
                        println!("{}", output::render_aggregation(&responses, render));
                    }
                    Err(err) => eprintln!("\t{err}"),
                }
            }
            Err(err) => println!("\t{err}"),
        }
    }
    Ok(())
}

/// `-c '<line>'`: run one command line and exit. Parse failures become
/// usage errors with a non-zero exit code.
pub async fn run_once<T: Transport>(
    console: &mut Console<T>,
    line: &str,
    render: RenderOptions,
) -> Result<(), CliError> {
    match parse::parse_line(line) {
        Ok(ConsoleCommand::Send { target, verb }) => {
            let responses = console.dispatch(target, verb).await?;
            println!("{}", output::render_aggregation(&responses, render));
            Ok(())
        }
        Ok(ConsoleCommand::Help) => {
            println!("{}", parse::help_table());
            Ok(())
        }
        Ok(ConsoleCommand::History | ConsoleCommand::Exit) => Err(CliError::Usage {
            message: format!("'{line}' only makes sense in an interactive session"),
        }),
        Err(err) => Err(usage(&err)),
    }
}

fn usage(err: &ParseError) -> CliError {
    CliError::Usage {
        message: err.to_string(),
    }
}

fn prompt() -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, ">>> ")?;
    stdout.flush()?;
    Ok(())
}
