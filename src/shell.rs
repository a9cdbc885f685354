use std::io::Write;

use anyhow::Result;
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader, stdin};

use crate::client::{Dispatcher, ExecResult, Outcome, SessionConfig, construct, exec};

const PROMPT: &str = "tftp> ";

/// Reads command lines from stdin until the literal line `quit` or EOF.
/// With `concurrent` set, constructed commands run on worker tasks while
/// the loop keeps reading.
pub async fn run(config: SessionConfig, concurrent: bool) -> Result<()> {
    info!("starting shell for {}", config.hostname);

    if concurrent {
        run_concurrent(config).await
    } else {
        run_serial(config).await
    }
}

async fn run_serial(mut config: SessionConfig) -> Result<()> {
    let mut lines = BufReader::new(stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        if line == "quit" {
            break;
        }

        match exec(&line, &mut config) {
            Outcome::Idle | Outcome::Applied(ExecResult::Success) => {}
            Outcome::Applied(result) => println!("error: {result}"),
            Outcome::Rejected(err) => println!("error: {err}"),
        }
        prompt()?;
    }

    Ok(())
}

async fn run_concurrent(config: SessionConfig) -> Result<()> {
    let mut dispatcher = Dispatcher::new(config);
    let mut lines = BufReader::new(stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        if line == "quit" {
            break;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if !tokens.is_empty() {
            match construct(&tokens) {
                Ok(cmd) => {
                    dispatcher.submit(cmd).await;
                }
                Err(err) => println!("error: {err}"),
            }
        }
        prompt()?;
    }

    // Let in-flight commands finish before the session ends.
    dispatcher.drain().await;

    Ok(())
}

fn prompt() -> Result<()> {
    print!("{PROMPT}");
    std::io::stdout().flush()?;
    Ok(())
}
