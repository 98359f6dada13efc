//! CLI commands

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::terminal::{format_activity, format_status, TerminalSink};
use crate::config::Config;
use crate::monitor::{MonitorState, PollingController, TokioScheduler};
use crate::session::models::CreateSessionRequest;
use crate::session::{JulesClient, RemoteSessionClient};

const NO_API_KEY_ERROR: &str =
    "API key not found. Set it with `jwatch config set-key <KEY>` or the JWATCH_API_KEY environment variable.";

#[derive(Parser)]
#[command(name = "jwatch")]
#[command(about = "Watch remote agent sessions and their activity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (default: ~/.jwatch/config.yml)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll a session's status and activities until interrupted
    Watch {
        /// Session ID
        session_id: String,

        /// Override the configured poll interval
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Show a session's current status
    Status {
        /// Session ID
        session_id: String,
    },

    /// List a session's activities
    Activities {
        /// Session ID
        session_id: String,
    },

    /// Send a message to a session's agent
    Message {
        /// Session ID
        session_id: String,

        /// Message text
        #[arg(long)]
        prompt: String,
    },

    /// List all sessions
    Sessions,

    /// List available sources
    Sources,

    /// Create a new session
    CreateSession {
        /// Task for the agent
        #[arg(long)]
        prompt: String,

        /// Source name, e.g. sources/github/owner/repo
        #[arg(long)]
        source: String,

        /// Branch the agent starts from
        #[arg(long, default_value = "main")]
        branch: String,

        /// Session title
        #[arg(long, default_value = "")]
        title: String,
    },

    /// Inspect or edit the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Store the API key
    SetKey {
        /// API key
        key: String,
    },
}

fn build_client(config: &Config) -> Result<JulesClient> {
    let api_key = config.api_key().context(NO_API_KEY_ERROR)?;
    JulesClient::new(&api_key, config.api_base_url.clone(), config.request_timeout())
}

fn mask(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = key.chars().take(4).collect();
    format!("{}****", visible)
}

pub fn run() -> Result<()> {
    let Cli { command, config: config_arg } = Cli::parse();
    let config_path = config_arg.as_deref();
    let mut config = Config::load(config_path)?;

    // Monitoring is cooperative: one thread, suspension only at remote calls
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        match command {
        Commands::Watch { session_id, interval_ms } => {
            let client = Arc::new(build_client(&config)?);

            let mut monitor_config = config.monitor;
            if let Some(ms) = interval_ms {
                monitor_config.poll_interval_ms = ms;
            }

            let controller = PollingController::new(
                client,
                Arc::new(TerminalSink::new()),
                Arc::new(TokioScheduler::new()),
                monitor_config,
            );
            controller.start(&session_id)?;
            let mut states = controller.subscribe();

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, stopping");
                    controller.stop();
                    Ok(())
                }
                _ = states.wait_for(|state| *state == MonitorState::Idle) => {
                    anyhow::bail!("Monitoring of {} ended after a failed fetch", session_id.trim())
                }
            }
        }

        Commands::Message { session_id, prompt } => {
            let client = build_client(&config)?;
            println!("Sending message to session: {}...", session_id.trim());
            client.send_message(session_id.trim(), &prompt).await?;
            println!("Message sent");
            Ok(())
        }

        Commands::Status { session_id } => {
            let client = build_client(&config)?;
            let snapshot = client.fetch_status(session_id.trim()).await?;
            println!("{}", format_status(&snapshot));
            Ok(())
        }

        Commands::Activities { session_id } => {
            let client = build_client(&config)?;
            let records = client.fetch_activities(session_id.trim()).await?;

            if records.is_empty() {
                println!("No activities found");
            } else {
                for line in records.iter().flat_map(format_activity) {
                    println!("{}", line);
                }
            }
            Ok(())
        }

        Commands::Sessions => {
            let client = build_client(&config)?;
            let sessions = client.list_sessions().await?;

            if sessions.is_empty() {
                println!("No sessions found");
            } else {
                for session in sessions {
                    println!("{}", format_status(&session));
                }
            }
            Ok(())
        }

        Commands::Sources => {
            let client = build_client(&config)?;
            let sources = client.list_sources().await?;

            if sources.is_empty() {
                println!("No sources found");
            } else {
                for source in sources {
                    println!("{}", source.name);
                }
            }
            Ok(())
        }

        Commands::CreateSession { prompt, source, branch, title } => {
            let client = build_client(&config)?;
            let request = CreateSessionRequest::new(prompt, source, branch, title);
            let session = client.create_session(&request).await?;

            println!("Created session: {}", session.name);
            if !session.title.is_empty() {
                println!("  Title: {}", session.title);
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("config file:      {}", Config::config_path(config_path)?.display());
                println!("api_key:          {}", mask(&config.api_key().unwrap_or_default()));
                println!("api_base_url:     {}", config.api_base_url);
                println!("request_timeout:  {}s", config.request_timeout_secs);
                println!("poll_interval_ms: {}", config.monitor.poll_interval_ms);
                println!("retry:            {:?}", config.monitor.retry);
                Ok(())
            }
            ConfigAction::SetKey { key } => {
                config.api_key = key.trim().to_string();
                config.save(config_path)?;
                println!("API key saved");
                Ok(())
            }
        },
        }
    })
}
