use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use roomcast_core::{IceServerConfig, SessionEvent};
use roomcast_session::{
    RtcEngineConfig, RtcEngineFactory, Session, SessionConfig, SessionParams, WsConnector,
    session_key_from_token,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomcast")]
#[command(about = "Join a signaling room and watch peer-to-peer sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to a room and print every session event until Ctrl-C.
    Join(JoinArgs),

    /// Print the session key carried by an auth token.
    DecodeToken { token: String },
}

#[derive(Args)]
struct JoinArgs {
    /// Signaling server host and path, without scheme.
    #[arg(long)]
    signaler: String,

    #[command(flatten)]
    credential: Credential,

    /// Connect with ws:// instead of wss://.
    #[arg(long)]
    insecure: bool,

    #[arg(long)]
    no_reconnect: bool,

    /// Include the own key as `src` in outbound frames.
    #[arg(long)]
    announce_source: bool,

    /// ICE server URL; may be repeated. Defaults to public STUN servers.
    #[arg(long = "ice-server")]
    ice_servers: Vec<String>,

    /// Print events as JSON lines.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Credential {
    #[arg(long)]
    token: Option<String>,

    #[arg(long)]
    session_key: Option<String>,

    #[arg(long)]
    query: Option<String>,
}

impl Credential {
    fn into_params(self) -> SessionParams {
        if let Some(token) = self.token {
            SessionParams::AuthToken(token)
        } else if let Some(key) = self.session_key {
            SessionParams::SessionKey(key.into())
        } else {
            SessionParams::Query(self.query.unwrap_or_default())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Join(args) => join(args).await?,
        Commands::DecodeToken { token } => {
            let key = session_key_from_token(&token).context("Failed to decode token")?;
            println!("{}", key);
        }
    }

    Ok(())
}

async fn join(args: JoinArgs) -> Result<()> {
    let mut config = SessionConfig::new(args.signaler, args.credential.into_params());
    config.secure = !args.insecure;
    config.announce_source = args.announce_source;
    config.reconnect.enabled = !args.no_reconnect;
    let reconnect = config.reconnect.enabled;

    let mut engine_config = RtcEngineConfig::default();
    if !args.ice_servers.is_empty() {
        engine_config.ice_servers = args.ice_servers.into_iter().map(IceServerConfig::new).collect();
    }

    let mut session = Session::new(
        config,
        Arc::new(WsConnector::new()),
        RtcEngineFactory::new(engine_config),
    )
    .context("Invalid session configuration")?;

    println!(
        "{} {}",
        "Joining as".green().bold(),
        session.session_key().to_string().bold()
    );

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    session.set_event_handler(move |event| {
        let _ = events_tx.send(event);
    });
    session.start()?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, leaving the room");
                break;
            }

            event = events_rx.recv() => {
                let Some(event) = event else { break };
                print_event(&event, args.json)?;

                if !reconnect && matches!(event, SessionEvent::ChannelClose { .. }) {
                    break;
                }
            }
        }
    }

    session.stop();
    session.join().await;
    println!("{}", "Session closed".yellow());
    Ok(())
}

fn print_event(event: &SessionEvent, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    let line = match event {
        SessionEvent::ChannelOpen => "channel open".green().to_string(),
        SessionEvent::ChannelError { message } => {
            format!("{} {}", "channel error".red(), message)
        }
        SessionEvent::ChannelClose { reason } => format!(
            "{} {}",
            "channel closed".yellow(),
            reason.as_deref().unwrap_or("")
        ),
        SessionEvent::MediaStart {
            session_key,
            stream_id,
            track_id,
        } => format!(
            "{} {} stream {} track {}",
            "media start".cyan(),
            session_key,
            stream_id,
            track_id
        ),
        SessionEvent::MediaStop {
            session_key,
            stream_id,
        } => format!("{} {} stream {}", "media stop".cyan(), session_key, stream_id),
        SessionEvent::PeerEnterRoom { session_key } => {
            format!("{} {}", "peer joined".green(), session_key)
        }
        SessionEvent::PeerLeaveRoom { session_key } => {
            format!("{} {}", "peer left".yellow(), session_key)
        }
        SessionEvent::PeerMediaStatus {
            session_key,
            media_state,
        } => format!("{} {} {}", "ice".blue(), session_key, media_state),
        SessionEvent::PeerSignalingStatus {
            session_key,
            signaling_state,
        } => format!("{} {} {}", "signaling".blue(), session_key, signaling_state),
        SessionEvent::Error {
            operation,
            session_key,
            message,
        } => match session_key {
            Some(key) => format!("{} {} ({}): {}", "error".red().bold(), operation, key, message),
            None => format!("{} {}: {}", "error".red().bold(), operation, message),
        },
    };

    println!("{}", line);
    Ok(())
}
