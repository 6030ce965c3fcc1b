use clap::Parser;
use eventstore_client::EventStoreClient;
use eventstore_client::parameters::{Cli, Commands};
use serde::Serialize;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let config = cli.connection.http_config()?;
    let client = EventStoreClient::with_config(
        &cli.connection.base_url,
        &cli.connection.username,
        &cli.connection.password,
        config,
    )?;

    match cli.command {
        Commands::Info => print_json(&client.server_info()?),
        Commands::ReadStream {
            stream,
            start: None,
            ..
        } => print_json(&client.read_stream(&stream)?),
        Commands::ReadStream {
            stream,
            start: Some(start),
            count,
            direction,
        } => print_json(&client.read_stream_page(&stream, start, count, direction)?),
        Commands::ReadEvent {
            stream,
            event_number,
        } => print_json(&client.read_event(&stream, event_number)?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    let output = serde_json::to_string_pretty(value)?;
    println!("{output}");
    Ok(())
}
