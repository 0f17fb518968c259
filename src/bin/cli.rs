//! Fossil CLI Client
//!
//! Command-line interface for talking to a Fossil server.

use clap::{Parser, Subcommand};
use fossil::{Client, ClientConfig, FossilError, Response};
use tracing_subscriber::{fmt, EnvFilter};

/// Fossil CLI
#[derive(Parser, Debug)]
#[command(name = "fossil-cli")]
#[command(about = "CLI for the Fossil record store")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8001")]
    server: String,

    /// Database to select after connecting
    #[arg(short, long, default_value = "default")]
    database: String,

    /// Protocol version to advertise
    #[arg(long, default_value = fossil::PROTOCOL_VERSION)]
    protocol_version: String,

    /// Connect timeout in milliseconds (0 = OS default)
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Read/write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    io_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect, negotiate the version and select the database
    Handshake,

    /// Append a record to a topic
    Append {
        /// The topic to append to
        topic: String,

        /// The record contents
        data: String,
    },

    /// Switch to another database after the handshake
    Use {
        /// The database to switch to
        name: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,fossil=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        match e.application_error() {
            Some((code, message)) => eprintln!("{} {}", code, message),
            None => eprintln!("error: {}", e),
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), FossilError> {
    let config = ClientConfig::builder()
        .server_addr(&args.server)
        .database(&args.database)
        .protocol_version(&args.protocol_version)
        .connect_timeout_ms(args.connect_timeout_ms)
        .read_timeout_ms(args.io_timeout_ms)
        .write_timeout_ms(args.io_timeout_ms)
        .build();

    tracing::info!("Connecting to {} (database {})", config.server_addr, config.database);
    let mut client = Client::connect(config)?;

    match args.command {
        Commands::Handshake => {
            println!(
                "connected: server {} database {}",
                client.server_version().unwrap_or("?"),
                client.database().unwrap_or("?")
            );
            Ok(())
        }
        Commands::Append { topic, data } => {
            let response = client.append(&topic, data.as_bytes())?;
            print_response(response)
        }
        Commands::Use { name } => {
            let response = client.use_database(&name)?;
            print_response(response)
        }
    }
}

/// Print a reply; `ERR` becomes the process error
fn print_response(response: Response) -> Result<(), FossilError> {
    match response.into_result()? {
        Response::Unknown { command } => {
            println!("unrecognized response {}", command);
        }
        other => {
            println!("{} {}", other.code().unwrap_or_default(), other.text().unwrap_or_default());
        }
    }
    Ok(())
}
