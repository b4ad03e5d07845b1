//! Async driver for [`MapEngine`].
//!
//! [`MapSession`] owns the engine and runs it on a single task, so every
//! state change stays serialized in arrival order. It multiplexes four
//! triggers with `tokio::select!`:
//!
//! - host input (viewport events, taps, filter changes, panel callbacks)
//! - completed searches, each tagged with the ticket it was issued under
//! - the engine's next deadline (debounce emission or a render gate closing)
//! - cancellation
//!
//! Searches run on their own spawned tasks and report back over a channel;
//! the engine's sequencer drops anything superseded in the meantime.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::debounce::ViewportEvent;
use crate::engine::{MapCommand, MapEngine, ResponseOutcome, SearchRequest};
use crate::markers::MarkerDescriptor;
use crate::model::Venue;
use crate::query::SearchFilters;
use crate::search::{RequestTicket, SearchError, SearchResponse, SearchService};
use crate::selection::{PanelCommand, QueuedAnimator, SelectionController};

/// Capacity of the internal search-result channel.
const RESULT_CHANNEL_CAPACITY: usize = 16;

/// Events from the host UI.
#[derive(Debug, Clone)]
pub enum SessionInput {
    Viewport(ViewportEvent),
    VenueTapped(String),
    ClusterTapped(String),
    RowTapped(String),
    BackgroundTapped,
    CloseTapped,
    FiltersChanged(SearchFilters),
    /// Host-owned selection (controlled mode).
    ExternalSelection(Option<Venue>),
    PanelOpenFinished,
    PanelCloseFinished,
}

/// Updates for the host UI.
#[derive(Debug, Clone)]
pub enum SessionOutput {
    /// Full marker set; sent whenever it differs from the previous one.
    Markers(Vec<MarkerDescriptor>),
    Command(MapCommand),
    Panel(PanelCommand),
    /// The selection changed.
    Selection(Option<Venue>),
    /// A search failed; the previous markers stay.
    SearchFailed(String),
}

type SearchResult = (RequestTicket, Result<SearchResponse, SearchError>);

/// What one host event asks the session loop to do.
struct InputEffects {
    search: Option<SearchRequest>,
    command: Option<MapCommand>,
}

impl InputEffects {
    fn none() -> Self {
        Self {
            search: None,
            command: None,
        }
    }
}

/// Current time as a `std` instant, following tokio's (possibly paused) clock.
fn clock() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

/// Runs a [`MapEngine`] against a [`SearchService`].
pub struct MapSession<S, C> {
    engine: MapEngine<C, QueuedAnimator>,
    service: Arc<S>,
    input_rx: mpsc::Receiver<SessionInput>,
    output_tx: mpsc::Sender<SessionOutput>,
    shutdown: CancellationToken,
    last_markers: Vec<MarkerDescriptor>,
    last_selected: Option<String>,
}

impl<S, C> MapSession<S, C>
where
    S: SearchService + 'static,
    C: SelectionController + 'static,
{
    pub fn new(
        engine: MapEngine<C, QueuedAnimator>,
        service: Arc<S>,
        input_rx: mpsc::Receiver<SessionInput>,
        output_tx: mpsc::Sender<SessionOutput>,
        shutdown: CancellationToken,
    ) -> Self {
        let last_selected = engine.selected().map(|v| v.id.clone());
        Self {
            engine,
            service,
            input_rx,
            output_tx,
            shutdown,
            last_markers: Vec::new(),
            last_selected,
        }
    }

    /// Start the session as an async task.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until cancelled, the input channel closes, or the output
    /// receiver is dropped.
    pub async fn run(mut self) {
        info!("Map session started");

        let (result_tx, mut result_rx) = mpsc::channel::<SearchResult>(RESULT_CHANNEL_CAPACITY);

        if let Some(request) = self.engine.start() {
            self.spawn_search(request, &result_tx);
        }

        loop {
            if !self.flush().await {
                debug!("Session output channel closed, stopping");
                break;
            }

            let deadline = self
                .engine
                .next_deadline(clock())
                .map(tokio::time::Instant::from_std);
            let wake = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!("Map session cancelled");
                    break;
                }

                input = self.input_rx.recv() => {
                    match input {
                        Some(input) => {
                            let effects = self.handle_input(input);
                            if let Some(request) = effects.search {
                                self.spawn_search(request, &result_tx);
                            }
                            if let Some(command) = effects.command {
                                if !send(&self.output_tx, SessionOutput::Command(command)).await {
                                    debug!("Session output channel closed, stopping");
                                    break;
                                }
                            }
                        }
                        None => {
                            debug!("Session input channel closed, stopping");
                            break;
                        }
                    }
                }

                Some((ticket, result)) = result_rx.recv() => {
                    let outcome = self.engine.apply_response(ticket, result, clock());
                    if let ResponseOutcome::Failed(e) = outcome {
                        let failed = SessionOutput::SearchFailed(e.to_string());
                        if !send(&self.output_tx, failed).await {
                            break;
                        }
                    }
                }

                _ = wake => {
                    if let Some(request) = self.engine.poll(clock()) {
                        self.spawn_search(request, &result_tx);
                    }
                }
            }
        }

        info!("Map session stopped");
    }

    /// Applies one host event.
    fn handle_input(&mut self, input: SessionInput) -> InputEffects {
        let now = clock();
        match input {
            SessionInput::Viewport(event) => {
                self.engine.handle_viewport_event(event, now);
                InputEffects::none()
            }
            SessionInput::VenueTapped(id) => InputEffects {
                search: None,
                command: self.engine.tap_venue(&id, now).command,
            },
            SessionInput::ClusterTapped(id) => InputEffects {
                search: None,
                command: self.engine.tap_cluster(&id),
            },
            SessionInput::RowTapped(id) => {
                self.engine.tap_row(&id, now);
                InputEffects::none()
            }
            SessionInput::BackgroundTapped => {
                self.engine.tap_background(now);
                InputEffects::none()
            }
            SessionInput::CloseTapped => {
                self.engine.tap_close(now);
                InputEffects::none()
            }
            SessionInput::FiltersChanged(filters) => InputEffects {
                search: self.engine.set_filters(filters),
                command: None,
            },
            SessionInput::ExternalSelection(selection) => {
                self.engine.set_external_selection(selection, now);
                InputEffects::none()
            }
            SessionInput::PanelOpenFinished => {
                self.engine.panel_open_finished();
                InputEffects::none()
            }
            SessionInput::PanelCloseFinished => {
                self.engine.panel_close_finished();
                InputEffects::none()
            }
        }
    }

    fn spawn_search(&self, request: SearchRequest, result_tx: &mpsc::Sender<SearchResult>) {
        let service = Arc::clone(&self.service);
        let result_tx = result_tx.clone();
        let SearchRequest { ticket, query } = request;

        tokio::spawn(async move {
            let result = service.search(&query).await;
            if result_tx.send((ticket, result)).await.is_err() {
                debug!(%ticket, "Session gone before search completed");
            }
        });
    }

    /// Sends pending panel commands, selection and marker changes.
    ///
    /// Returns `false` once the output receiver is gone.
    async fn flush(&mut self) -> bool {
        for command in self.engine.panel_mut().animator_mut().drain() {
            if !send(&self.output_tx, SessionOutput::Panel(command)).await {
                return false;
            }
        }

        let selected = self.engine.selected().cloned();
        let selected_id = selected.as_ref().map(|v| v.id.clone());
        if selected_id != self.last_selected {
            self.last_selected = selected_id;
            if !send(&self.output_tx, SessionOutput::Selection(selected)).await {
                return false;
            }
        }

        let markers = self.engine.markers(clock());
        if markers != self.last_markers {
            self.last_markers = markers.clone();
            if !send(&self.output_tx, SessionOutput::Markers(markers)).await {
                return false;
            }
        }

        true
    }
}

async fn send(output_tx: &mpsc::Sender<SessionOutput>, output: SessionOutput) -> bool {
    output_tx.send(output).await.is_ok()
}
