//! # twocat
//!
//! Headless front end for the 2cat client core. Reads one JSON intent per
//! line on stdin, e.g. `{"intent":"selectBoard","name":"/b/"}`, and prints
//! every view event as one JSON line on stdout. Logs go to stderr.

use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use twocat_client::{init_tracing, Client, ClientConfig, HttpLinkClassifier, Intent};
use twocat_media::NoDevices;
use twocat_store::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    init_tracing();
    info!("Starting 2cat v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ClientConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Open the store and build the client
    // -----------------------------------------------------------------------
    let database = match &config.db_path {
        Some(path) => Database::open_at(path),
        None => Database::new(),
    }
    .context("failed to open the post database")?;
    info!(
        path = ?database.path(),
        schema = database.schema_version()?,
        "Database ready"
    );

    let classifier = HttpLinkClassifier::new(&config.classifier_url);
    info!(endpoint = %classifier.endpoint(), "Link classifier configured");

    let client = Client::new(database, classifier, NoDevices, config.event_capacity);

    // -----------------------------------------------------------------------
    // 4. Print view events
    // -----------------------------------------------------------------------
    let mut events = client.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::error!(error = %e, "Failed to encode view event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event printer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // -----------------------------------------------------------------------
    // 5. Read intents until stdin closes
    // -----------------------------------------------------------------------
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let intent: Intent = match serde_json::from_str(line) {
            Ok(intent) => intent,
            Err(e) => {
                warn!(error = %e, "Ignoring malformed intent");
                continue;
            }
        };
        // Failures are already published as notices.
        let _ = client.dispatch(intent).await;
    }

    info!("Input closed, shutting down");
    drop(client);
    if tokio::time::timeout(Duration::from_secs(1), printer).await.is_err() {
        warn!("Event printer did not finish in time");
    }

    Ok(())
}
