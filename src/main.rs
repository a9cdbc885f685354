use std::process::ExitCode;

use clap::Parser;

use tftpc::client::SessionConfig;
use tftpc::shell;

const DEFAULT_HOSTNAME: &str = "localhost";
const DEFAULT_MODE: &str = "netascii";
const DEFAULT_PORT_RANGE: &str = "2048:65535";
const DEFAULT_TIMEOUT: &str = "60";
const DEFAULT_REXMT_TIMEOUT: &str = "10";

#[derive(Parser, Debug)]
#[command(about = "trivial file transfer protocol client")]
struct Args {
    // Remote host, an IPv4 address or a DNS name.
    #[arg(short = 'n', long, default_value_t = DEFAULT_HOSTNAME.to_string())]
    hostname: String,

    // Transfer mode, one of 'ascii' or 'binary'.
    #[arg(short, long, default_value_t = DEFAULT_MODE.to_string())]
    mode: String,

    // Single local port for tx/rx; overrides --port-range.
    #[arg(short, long)]
    port: Option<String>,

    // Range of local ports for tx/rx in the format START:END.
    #[arg(short = 'R', long, default_value_t = DEFAULT_PORT_RANGE.to_string())]
    port_range: String,

    // Total transmission time in seconds.
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT.to_string())]
    timeout: String,

    // Per packet retransmission time in seconds.
    #[arg(short, long, default_value_t = DEFAULT_REXMT_TIMEOUT.to_string())]
    rexmt_timeout: String,

    // Interpret the ':' character literally in file names.
    #[arg(short, long)]
    literal: bool,

    // Apply commands on worker tasks instead of inline.
    #[arg(long)]
    concurrent: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    std_logger::Config::logfmt().init();

    let args = Args::parse();

    // A single --port pins both ends of the range.
    let port_range = match &args.port {
        Some(port) => format!("{port}:{port}"),
        None => args.port_range.clone(),
    };

    let config = match SessionConfig::create(
        &args.mode,
        &port_range,
        args.literal,
        &args.hostname,
        &args.timeout,
        &args.rexmt_timeout,
    ) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = shell::run(config, args.concurrent).await {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
