//! # outofoffice-node
//!
//! Hosts a notification session for one user against the local SQLite
//! document store and logs every notification it produces. Stops on Ctrl+C.

mod config;

use outofoffice_core::{Client, CoreConfig, NotificationSession};
use outofoffice_shared::constants::APP_NAME;
use outofoffice_store::DatabaseInfo;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::NodeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,outofoffice_core=debug,outofoffice_node=debug")
            }),
        )
        .init();

    info!("Starting {} node v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let node_config = NodeConfig::from_env()?;
    let core_config = CoreConfig::from_env();
    info!(?node_config, "Loaded node configuration");
    info!(
        match_mode = ?core_config.match_mode,
        poll_interval = ?core_config.notifications.poll_interval,
        "Loaded core configuration"
    );

    // -----------------------------------------------------------------------
    // 3. Open the document store
    // -----------------------------------------------------------------------
    let db_info = match node_config.database_path.clone() {
        Some(path) => DatabaseInfo::Sqlite(path),
        None => DatabaseInfo::SqliteDefault,
    };
    let db = db_info.connect().await?;
    let client = Client::new(db, core_config);

    // -----------------------------------------------------------------------
    // 4. Start the notification session
    // -----------------------------------------------------------------------
    let (tx, mut rx) = mpsc::channel(64);
    let mut session = NotificationSession::new(client, tx);
    session.start(&node_config.user_id).await;

    loop {
        tokio::select! {
            notification = rx.recv() => {
                let Some(n) = notification else { break };
                info!(
                    chat_id = %n.chat_id,
                    sender_id = %n.sender_id,
                    title = %n.title,
                    body = %n.body,
                    "New message"
                );
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                break;
            }
        }
    }

    session.stop().await;
    Ok(())
}
