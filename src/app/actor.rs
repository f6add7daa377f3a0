//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::config::Config;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        config: &Config,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(config),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // First page is requested as soon as the screen is mounted
        let initial = self.state.mount();
        self.dispatch(initial);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    let follow_up = self.state.handle_response(response);
                    self.dispatch(follow_up);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn dispatch(&self, command: Option<NetworkCommand>) {
        if let Some(cmd) = command {
            let _ = self.network_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Grid navigation
            UiEvent::SelectLeft => {
                let cmd = self.state.select_left();
                self.dispatch(cmd);
            }
            UiEvent::SelectRight => {
                let cmd = self.state.select_right();
                self.dispatch(cmd);
            }
            UiEvent::SelectUp => {
                let cmd = self.state.select_up();
                self.dispatch(cmd);
            }
            UiEvent::SelectDown => {
                let cmd = self.state.select_down();
                self.dispatch(cmd);
            }
            UiEvent::PageUp => {
                let cmd = self.state.page_up();
                self.dispatch(cmd);
            }
            UiEvent::PageDown => {
                let cmd = self.state.page_down();
                self.dispatch(cmd);
            }
            UiEvent::SelectFirst => {
                let cmd = self.state.select_first();
                self.dispatch(cmd);
            }
            UiEvent::SelectLast => {
                let cmd = self.state.select_last();
                self.dispatch(cmd);
            }
            UiEvent::ViewportResized(rows) => {
                let cmd = self.state.resize(rows);
                self.dispatch(cmd);
            }

            // Screen actions
            UiEvent::Refresh => {
                for cmd in self.state.refresh() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::OpenSelected => self.state.open_selected(),
            UiEvent::Back => self.state.go_back(),
            UiEvent::DetailScrollUp => self.state.details_scroll_up(),
            UiEvent::DetailScrollDown => self.state.details_scroll_down(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;

    #[tokio::test]
    async fn test_mount_requests_first_page_and_quit_shuts_down() {
        let (net_tx, mut net_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(&Config::default(), net_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, resp_rx));

        let id = match net_rx.recv().await {
            Some(NetworkCommand::FetchCatalog { id, .. }) => id,
            other => panic!("expected fetch, got {:?}", other),
        };
        let first = render_rx.recv().await.unwrap();
        assert!(first.is_loading);

        let products = vec![Product::new(1, "Backpack", 109.95, "bag.png")];
        resp_tx
            .send(NetworkResponse::CatalogLoaded { id, products: products.clone(), time_ms: 5 })
            .unwrap();
        let rendered = render_rx.recv().await.unwrap();
        assert_eq!(rendered.products, products);

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();
        // The one-item page sits at the end of the viewport, so another load
        // may have been requested before shutdown
        let mut saw_shutdown = false;
        while let Ok(cmd) = net_rx.try_recv() {
            saw_shutdown |= matches!(cmd, NetworkCommand::Shutdown);
        }
        assert!(saw_shutdown);
    }
}
