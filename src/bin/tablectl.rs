//! tablectl
//!
//! Encodes table requests and decodes backend replies from the command line.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tableproc::protocol::{
    encode_request, read_response, Request, RequestIdGenerator, Service, TableOperation,
    Timestamp,
};
use tableproc::{ProtocolConfig, Result, TableError};
use tracing_subscriber::{fmt, EnvFilter};

/// tablectl
#[derive(Parser, Debug)]
#[command(name = "tablectl")]
#[command(about = "Encode and decode table backend protocol lines")]
#[command(version)]
struct Args {
    /// Protocol version written in request headers
    #[arg(long, default_value = tableproc::config::DEFAULT_PROTOCOL_VERSION)]
    protocol_version: String,

    /// Maximum accepted line length in bytes
    #[arg(long, default_value_t = tableproc::config::DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one request line
    Encode {
        /// Table name
        #[arg(short, long)]
        table: String,

        /// Request id (default: next from a fresh counter)
        #[arg(long)]
        id: Option<u64>,

        #[command(subcommand)]
        operation: OperationArg,
    },

    /// Decode response lines read from stdin
    Decode,
}

#[derive(Subcommand, Debug)]
enum OperationArg {
    Open,
    Update,
    Close,
    Lookup {
        service: ServiceArg,
        key: String,
    },
    Fetch {
        service: ServiceArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ServiceArg {
    Alias,
    Domain,
    Credentials,
    Netaddr,
    Userinfo,
    Source,
    Mailaddr,
    Addrname,
    Mailaddrmap,
    Relayhost,
    String,
    Regex,
    None,
}

impl From<ServiceArg> for Service {
    fn from(arg: ServiceArg) -> Self {
        match arg {
            ServiceArg::Alias => Service::Alias,
            ServiceArg::Domain => Service::Domain,
            ServiceArg::Credentials => Service::Credentials,
            ServiceArg::Netaddr => Service::NetAddr,
            ServiceArg::Userinfo => Service::UserInfo,
            ServiceArg::Source => Service::Source,
            ServiceArg::Mailaddr => Service::MailAddr,
            ServiceArg::Addrname => Service::AddrName,
            ServiceArg::Mailaddrmap => Service::MailAddrMap,
            ServiceArg::Relayhost => Service::RelayHost,
            ServiceArg::String => Service::String,
            ServiceArg::Regex => Service::Regex,
            ServiceArg::None => Service::None,
        }
    }
}

impl From<OperationArg> for TableOperation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Open => TableOperation::Open,
            OperationArg::Update => TableOperation::Update,
            OperationArg::Close => TableOperation::Close,
            OperationArg::Lookup { service, key } => TableOperation::Lookup {
                service: service.into(),
                key,
            },
            OperationArg::Fetch { service } => TableOperation::Fetch {
                service: service.into(),
            },
        }
    }
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tableproc=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns false if any input line failed to decode
fn run(args: Args) -> Result<bool> {
    let config = ProtocolConfig::builder()
        .protocol_version(args.protocol_version)
        .max_line_length(args.max_line_length)
        .build()?;

    match args.command {
        Commands::Encode {
            table,
            id,
            operation,
        } => {
            let request = Request {
                request_id: id.unwrap_or_else(|| RequestIdGenerator::new().next_id()),
                timestamp: Timestamp::now(),
                table,
                operation: operation.into(),
            };
            let line = encode_request(&config, &request)?;
            io::stdout().write_all(line.as_bytes())?;
            Ok(true)
        }
        Commands::Decode => {
            let mut stdin = io::stdin().lock();
            let mut stdout = io::stdout().lock();
            let mut all_ok = true;

            loop {
                match read_response(&mut stdin, &config) {
                    Ok(Some(response)) => writeln!(
                        stdout,
                        "id={:016x} status={} payload={:?}",
                        response.request_id,
                        response.status,
                        response.payload_lossy()
                    )?,
                    Ok(None) => break,
                    Err(TableError::Decode(e)) => {
                        writeln!(stdout, "error: {}", e)?;
                        all_ok = false;
                    }
                    Err(e) => return Err(e),
                }
            }

            Ok(all_ok)
        }
    }
}
