//! Operator tooling for the CentralEGA message broker.
//!
//! Exit codes: 0 on success, 1 on connection or operational failure,
//! 2 when a scan finds no matching message — calling automation tells
//! "no match" and "broker down" apart by the code alone.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use cega_core::BrokerConfig;
use cega_mq::AmqpBroker;

mod commands;

#[derive(Parser)]
#[command(name = "cega-mq")]
#[command(about = "Publish, inspect, and reset CentralEGA broker queues", version)]
struct Cli {
    /// Of the form 'amqp://<user>:<password>@<host>:<port>/<vhost>'
    #[arg(
        long,
        global = true,
        env = "CEGA_CONNECTION",
        default_value = "amqp://localhost:5672/%2F"
    )]
    connection: String,

    /// Topic exchange to publish through
    #[arg(long, global = true, env = "CEGA_EXCHANGE", default_value = "localega.v1")]
    exchange: String,

    /// Connection attempts before giving up
    #[arg(long, global = true, default_value_t = 1)]
    connection_attempts: u32,

    /// Seconds between connection attempts
    #[arg(long, global = true, default_value_t = 10)]
    retry_delay: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Trigger the ingestion of a file already in a user's inbox
    Publish(commands::publish::PublishArgs),
    /// Publish a raw JSON message under a routing key
    Send(commands::send::SendArgs),
    /// Print the correlation id of the event matching a user and filepath
    Find(commands::find::FindArgs),
    /// Print the correlation id of the event carrying an encrypted checksum
    FindChecksum(commands::find_checksum::FindChecksumArgs),
    /// Dump the message with the given correlation id, without consuming it
    Get(commands::get::GetArgs),
    /// Discard every message in the given queues
    Purge(commands::purge::PurgeArgs),
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = BrokerConfig {
        connection: cli.connection,
        exchange: cli.exchange,
        connection_attempts: cli.connection_attempts,
        retry_delay_secs: cli.retry_delay,
        ..Default::default()
    };
    let broker = AmqpBroker::connect(&config).await?;

    let code = match cli.command {
        Command::Publish(args) => commands::publish::run(&broker, args).await?,
        Command::Send(args) => commands::send::run(&broker, args).await?,
        Command::Find(args) => commands::find::run(&broker, args).await?,
        Command::FindChecksum(args) => commands::find_checksum::run(&broker, args).await?,
        Command::Get(args) => commands::get::run(&broker, args).await?,
        Command::Purge(args) => commands::purge::run(&broker, args).await?,
    };
    Ok(code)
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}
