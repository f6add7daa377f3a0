//! Network actor - runs catalog fetches in the Tokio async runtime

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{create_client, fetch_catalog};

/// Network actor that processes fetch commands
pub struct NetworkActor {
    client: reqwest::Client,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_fetches: JoinSet<u64>,
    cancel_handles: HashMap<u64, oneshot::Sender<()>>,
}

impl NetworkActor {
    pub fn new(response_tx: mpsc::UnboundedSender<NetworkResponse>, timeout: Option<Duration>) -> Self {
        NetworkActor {
            client: create_client(timeout),
            response_tx,
            active_fetches: JoinSet::new(),
            cancel_handles: HashMap::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::FetchCatalog { id, url }) => {
                            let (cancel_tx, cancel_rx) = oneshot::channel();
                            self.cancel_handles.insert(id, cancel_tx);

                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_fetches.spawn(async move {
                                run_fetch(&client, id, &url, response_tx, cancel_rx).await;
                                id
                            });
                        }

                        Some(NetworkCommand::CancelFetch(id)) => {
                            if let Some(cancel_tx) = self.cancel_handles.remove(&id) {
                                tracing::info!(id, "Cancelling fetch");
                                let _ = cancel_tx.send(());
                                let _ = self.response_tx.send(NetworkResponse::Cancelled { id });
                            }
                        }

                        Some(NetworkCommand::Shutdown) => {
                            for (_, cancel_tx) in self.cancel_handles.drain() {
                                let _ = cancel_tx.send(());
                            }
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(result) = self.active_fetches.join_next() => {
                    if let Ok(id) = result {
                        self.cancel_handles.remove(&id);
                    }
                }
            }
        }
    }
}

/// Fetch the catalog unless cancelled first; cancelled fetches send nothing
async fn run_fetch(
    client: &reqwest::Client,
    id: u64,
    url: &str,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let start = Instant::now();
    tracing::info!(id, url, "Fetching catalog");

    let result = tokio::select! {
        biased;

        _ = &mut cancel_rx => return,
        result = fetch_catalog(client, url) => result,
    };

    let time_ms = start.elapsed().as_millis() as u64;
    let response = match result {
        Ok(products) => NetworkResponse::CatalogLoaded { id, products, time_ms },
        Err(error) => NetworkResponse::FetchFailed { id, error, time_ms },
    };
    let _ = response_tx.send(response);
}
