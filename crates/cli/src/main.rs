// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

// Hub Connect - CLI Client
// Command-line front-end for the provider daemon

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hub_connect_core::{
    enroll_hub, full_reload, set_auto_mode, set_node_mode, ClientConfig, CoreEventHandler,
    CoreState, DaemonClient, Error, NodeId, NodeRow, NodeSnapshot, StatusPoller,
};

#[derive(Parser)]
#[command(name = "hubctl")]
#[command(about = "Hub Connect provider control", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show daemon status
    Status,

    /// List known nodes with their connection state
    Nodes {
        /// Output as JSON for scripting
        #[arg(short, long)]
        json: bool,
    },

    /// Connect a node by id
    Connect {
        /// Node id as shown by `nodes`
        node_id: String,
    },

    /// Disconnect a node by id
    Disconnect {
        /// Node id as shown by `nodes`
        node_id: String,
    },

    /// Switch the daemon between automatic and manual connection mode
    Auto {
        /// "on" or "off"
        #[arg(value_parser = ["on", "off"])]
        mode: String,
    },

    /// Enroll a hub by address and connect to it
    AddHub {
        /// Hub address as host:port
        host_port: String,
    },

    /// Poll the daemon and print changes until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hubctl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = hub_connect_common::load_client_config().context("Failed to load client config")?;
    let client = DaemonClient::from_config(&config).context("Failed to resolve daemon socket")?;

    match cli.command {
        Commands::Status => show_status(&client).await,
        Commands::Nodes { json } => show_nodes(&client, json).await,
        Commands::Connect { node_id } => change_node_mode(&client, &node_id, 1).await,
        Commands::Disconnect { node_id } => change_node_mode(&client, &node_id, 0).await,
        Commands::Auto { mode } => change_auto_mode(&client, mode == "on").await,
        Commands::AddHub { host_port } => add_hub(&client, &host_port).await,
        Commands::Watch => watch(&client, &config).await,
    }
}

async fn show_status(client: &DaemonClient) -> Result<()> {
    use hub_connect_common::ProviderApi;

    match client.status().await {
        Ok(status) => {
            let text = status.state_text();
            if status.is_ready() {
                println!("Provider status: {}", text.green());
            } else {
                println!("Provider status: {}", text.yellow());
            }
        }
        Err(Error::Unreachable) => println!("Provider status: {}", "No Connection".red()),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn show_nodes(client: &DaemonClient, json: bool) -> Result<()> {
    let outcome = full_reload(client)
        .await
        .context("Daemon unreachable; is the provider running?")?;
    let mut state = CoreState::new();
    state.apply_reload(outcome);

    let rows = state.rows();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "Auto mode: {}",
        if state.auto_level() > 0 {
            "on".green()
        } else {
            "off".normal()
        }
    );
    print_node_table(&rows);
    Ok(())
}

fn print_node_table(rows: &[NodeRow]) {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Status", "Address", "Node ID", "Mode"]);
    for row in rows {
        let mode = if row.connected { "connected" } else { "off" };
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(&row.status),
            Cell::new(&row.address),
            Cell::new(row.node_id.as_ref().map(|id| id.as_str()).unwrap_or("")),
            Cell::new(mode),
        ]);
    }
    println!("{table}");
}

async fn change_node_mode(client: &DaemonClient, node_id: &str, level: u32) -> Result<()> {
    let outcome = full_reload(client)
        .await
        .context("Daemon unreachable; is the provider running?")?;
    let mut state = CoreState::new();
    state.apply_reload(outcome);

    let id = NodeId::from(node_id);
    if state.snapshot().find(&id).is_none() {
        anyhow::bail!("Unknown node id: {node_id} (try `hubctl nodes`)");
    }

    set_node_mode(client, &mut state, &id, level).await;
    let verb = if level > 0 { "connect" } else { "disconnect" };
    println!("Requested {} for {}", verb, node_id.bold());
    Ok(())
}

async fn change_auto_mode(client: &DaemonClient, on: bool) -> Result<()> {
    let mut state = CoreState::new();
    set_auto_mode(client, &mut state, if on { 1 } else { 0 }).await;
    println!("Auto mode {}", if on { "on".green() } else { "off".normal() });
    Ok(())
}

async fn add_hub(client: &DaemonClient, host_port: &str) -> Result<()> {
    let http = reqwest::Client::new();
    let identity = enroll_hub(client, &http, host_port)
        .await
        .with_context(|| format!("Could not enroll hub at {host_port}"))?;
    println!(
        "Enrolled {} ({}) at {}",
        identity.host_name.bold(),
        identity.node_id,
        host_port
    );

    // Re-establish truth now rather than waiting for the next poll.
    let outcome = full_reload(client).await?;
    let mut state = CoreState::new();
    state.apply_reload(outcome);
    print_node_table(&state.rows());
    Ok(())
}

/// Event handler that prints changes as they happen.
struct PrintHandler;

impl CoreEventHandler for PrintHandler {
    fn on_readiness_changed(&self, ready: bool) {
        if ready {
            println!("{}", "daemon ready".green());
        } else {
            println!("{}", "daemon lost".red());
        }
    }

    fn on_daemon_status(&self, _text: &str) {}

    fn on_nodes_reloaded(&self, snapshot: &NodeSnapshot) {
        println!("{} nodes known", snapshot.len());
    }

    fn on_statuses_changed(&self, statuses: &HashMap<String, String>) {
        for (address, status) in statuses {
            println!("  {address}: {status}");
        }
    }
}

async fn watch(client: &DaemonClient, config: &ClientConfig) -> Result<()> {
    let mut poller = StatusPoller::new();
    let mut state = CoreState::new();
    println!("Polling every {:?}; Ctrl-C to stop", config.poll_interval());
    poller
        .run(client, &mut state, &PrintHandler, config.poll_interval())
        .await;
    Ok(())
}
