//! Minimal IRC bot.
//!
//! Registers, joins the given channels, answers PING and replies to lines
//! on a channel that address it as `<nick>: `.
//!
//! ```text
//! RUST_LOG=debug cargo run --example ping_bot -- irc.libera.chat -c '#prbottest'
//! ```

use std::time::Duration;

use clap::Parser;
use slirc_wire::{ClientConfig, Connection, Message, DEFAULT_PORT};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Server host name
    host: String,

    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    #[arg(short, long, default_value = "PRBot7")]
    nick: String,

    /// Channel to join, may be repeated
    #[arg(short, long = "channel", default_value = "#prbottest")]
    channels: Vec<String>,

    /// Give up on a silent server after this many seconds
    #[arg(long)]
    read_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::new(cli.host, cli.nick)
        .with_port(cli.port)
        .with_read_timeout(cli.read_timeout.map(Duration::from_secs));
    for channel in cli.channels {
        config = config.with_channel(channel);
    }

    let mut conn = Connection::connect(&config).await?;
    info!(host = %config.host, port = config.port, "connected");

    let sender = conn.sender();
    sender.register(&config.nickname).await?;
    for channel in &config.channels {
        sender.join(channel).await?;
    }

    let mention = format!("{}: ", config.nickname);
    loop {
        let msg = match conn.receive().await {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                info!("server closed the connection");
                break;
            }
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "skipping line");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match msg {
            Message::Ping { text } => sender.pong(text).await?,
            Message::Privmsg {
                source,
                channel,
                text,
            } if channel.starts_with('#') && text.starts_with(&mention) => {
                let reply = format!("{}: please keep it down.", source.nick);
                sender.privmsg(channel, &reply).await?;
            }
            Message::Join { source, channel } => debug!(%source, channel, "join"),
            Message::Part { source, channel } => debug!(%source, channel, "part"),
            Message::Kick {
                channel, target, ..
            } => debug!(channel, target, "kick"),
            _ => {}
        }
    }

    conn.disconnect().await?;
    Ok(())
}
