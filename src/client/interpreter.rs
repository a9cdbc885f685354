use log::debug;

use crate::client::command::{Command, ExecResult};
use crate::client::config::SessionConfig;
use crate::client::parse::ParseError;

/// What one line amounted to. The prompt loop renders `Rejected` and any
/// non-success `Applied` value; everything else is silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Blank line; nothing was done.
    Idle,
    Applied(ExecResult),
    Rejected(ParseError),
}

/// Builds the command named by the first token. The table of names is
/// fixed; anything else is an unknown command.
pub fn construct(tokens: &[&str]) -> Result<Command, ParseError> {
    let Some(name) = tokens.first() else {
        return Err(ParseError::UnknownCommand);
    };

    match *name {
        "connect" => Command::connect(tokens),
        "get" => Command::get(tokens),
        "put" => Command::put(tokens),
        "mode" => Command::mode(tokens),
        "literal" => Ok(Command::Literal),
        "status" => Ok(Command::Status),
        "timeout" => Command::timeout(tokens),
        "rexmt" => Command::rexmt(tokens),
        "quit" => Ok(Command::Quit),
        "help" | "?" => Command::help(tokens),
        _ => Err(ParseError::UnknownCommand),
    }
}

/// Runs one command line against the session: tokenize, construct, apply.
/// A rejected line leaves the configuration untouched. No state is kept
/// between lines.
pub fn exec(line: &str, config: &mut SessionConfig) -> Outcome {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Outcome::Idle;
    }

    debug!("dispatching '{}'", tokens[0]);
    match construct(&tokens) {
        Ok(cmd) => Outcome::Applied(cmd.apply(config)),
        Err(err) => Outcome::Rejected(err),
    }
}
