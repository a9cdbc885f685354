use std::fmt::Display;

use crate::client::config::SessionConfig;
use crate::client::parse::{self, ParseError, PortRange};
use crate::tftp::Mode;

/// Outcome of applying one command to the session. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecResult {
    Success,
    NotImplemented,
    UnknownCommandForHelp,
}

impl Display for ExecResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ExecResult::Success => "success",
            ExecResult::NotImplemented => "not implemented",
            ExecResult::UnknownCommandForHelp => "no help available for unknown command",
        };
        f.write_str(text)
    }
}

/// Argument shapes a `get` line can take. The shapes are mutually
/// exclusive; one line produces exactly one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetArgs {
    /// One file, or three or more, fetched under their own names.
    Files(Vec<String>),
    /// Fetch `remote` and store it as `local`.
    Pair { remote: String, local: String },
}

/// Argument shapes a `put` line can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutArgs {
    /// One file sent under its own name.
    Files(Vec<String>),
    /// Send `local` and store it as `remote`.
    Pair { local: String, remote: String },
    /// Send `files` into the remote directory `dir`.
    ToDir { files: Vec<String>, dir: String },
}

/// The closed set of shell commands. A value is immutable once
/// constructed and applied at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect { host: String, port: Option<u16> },
    Get(GetArgs),
    Put(PutArgs),
    Mode(Mode),
    Literal,
    Status,
    Timeout(u32),
    Rexmt(u32),
    Help { topic: String },
    Quit,
}

impl Command {
    /// `connect HOST [PORT]`
    pub fn connect(tokens: &[&str]) -> Result<Command, ParseError> {
        if tokens.len() < 2 || tokens.len() > 3 {
            return Err(ParseError::InvalidNumArgs);
        }

        let host = tokens[1].to_owned();
        let port = match tokens.get(2) {
            Some(text) => {
                Some(parse::parse_port(text).map_err(|_| ParseError::InvalidPortNum)?)
            }
            None => None,
        };

        Ok(Command::Connect { host, port })
    }

    /// `get FILE`, `get REMOTE LOCAL`, or `get FILE FILE FILE...`
    pub fn get(tokens: &[&str]) -> Result<Command, ParseError> {
        let args = match &tokens[1..] {
            [] => return Err(ParseError::InvalidNumArgs),
            [remote, local] => GetArgs::Pair {
                remote: (*remote).to_owned(),
                local: (*local).to_owned(),
            },
            files => GetArgs::Files(files.iter().map(|f| (*f).to_owned()).collect()),
        };

        Ok(Command::Get(args))
    }

    /// `put FILE`, `put LOCAL REMOTE`, or `put FILE FILE... DIR`
    pub fn put(tokens: &[&str]) -> Result<Command, ParseError> {
        let args = match &tokens[1..] {
            [] => return Err(ParseError::InvalidNumArgs),
            [file] => PutArgs::Files(vec![(*file).to_owned()]),
            [local, remote] => PutArgs::Pair {
                local: (*local).to_owned(),
                remote: (*remote).to_owned(),
            },
            [files @ .., dir] => PutArgs::ToDir {
                files: files.iter().map(|f| (*f).to_owned()).collect(),
                dir: (*dir).to_owned(),
            },
        };

        Ok(Command::Put(args))
    }

    /// `mode NAME`
    pub fn mode(tokens: &[&str]) -> Result<Command, ParseError> {
        if tokens.len() != 2 {
            return Err(ParseError::InvalidNumArgs);
        }

        let mode = parse::parse_mode(tokens[1]).map_err(|_| ParseError::InvalidMode)?;
        Ok(Command::Mode(mode))
    }

    /// `timeout SECONDS`
    pub fn timeout(tokens: &[&str]) -> Result<Command, ParseError> {
        if tokens.len() != 2 {
            return Err(ParseError::InvalidNumArgs);
        }

        Ok(Command::Timeout(parse::parse_time_value(tokens[1])?))
    }

    /// `rexmt SECONDS`
    pub fn rexmt(tokens: &[&str]) -> Result<Command, ParseError> {
        if tokens.len() != 2 {
            return Err(ParseError::InvalidNumArgs);
        }

        Ok(Command::Rexmt(parse::parse_time_value(tokens[1])?))
    }

    /// `help COMMAND` or `? COMMAND`
    pub fn help(tokens: &[&str]) -> Result<Command, ParseError> {
        if tokens.len() != 2 {
            return Err(ParseError::InvalidNumArgs);
        }

        Ok(Command::Help {
            topic: tokens[1].to_owned(),
        })
    }

    /// Applies the command against the session. Mutating commands
    /// overwrite already validated values and cannot fail; transfers are
    /// not wired up yet and report that.
    pub fn apply(&self, config: &mut SessionConfig) -> ExecResult {
        match self {
            Command::Connect { host, port } => {
                config.hostname = host.clone();
                if let Some(port) = port {
                    config.ports = PortRange {
                        start: *port,
                        end: *port,
                    };
                }
                ExecResult::Success
            }
            Command::Get(_) | Command::Put(_) => ExecResult::NotImplemented,
            Command::Mode(mode) => {
                config.mode = *mode;
                ExecResult::Success
            }
            Command::Literal => {
                config.literal = !config.literal;
                ExecResult::Success
            }
            Command::Status => {
                println!("{}", config.status_report());
                ExecResult::Success
            }
            Command::Timeout(seconds) => {
                config.timeout = *seconds;
                ExecResult::Success
            }
            Command::Rexmt(seconds) => {
                config.rexmt_timeout = *seconds;
                ExecResult::Success
            }
            Command::Help { topic } => match usage(topic) {
                Some(text) => {
                    println!("{text}");
                    ExecResult::Success
                }
                None => ExecResult::UnknownCommandForHelp,
            },
            Command::Quit => ExecResult::Success,
        }
    }
}

/// Usage text for one command name, or `None` for a name the shell does
/// not know.
pub fn usage(name: &str) -> Option<&'static str> {
    let text = match name {
        "connect" => "connect HOST [PORT]\n    set the remote host, and optionally the port, used for transfers",
        "get" => "get FILE | get REMOTEFILE LOCALFILE | get FILE FILE FILE...\n    fetch one or more files from the remote host",
        "put" => "put FILE | put LOCALFILE REMOTEFILE | put FILE FILE... REMOTEDIR\n    send one or more files to the remote host",
        "mode" => "mode ascii|binary\n    set the transfer mode",
        "literal" => "literal\n    toggle literal interpretation of ':' in file names",
        "status" => "status\n    show the current session settings",
        "timeout" => "timeout SECONDS\n    set the total transmission timeout",
        "rexmt" => "rexmt SECONDS\n    set the per packet retransmission timeout",
        "quit" => "quit\n    exit the shell",
        "help" | "?" => "help COMMAND\n    show usage for the named command",
        _ => return None,
    };

    Some(text)
}
