//! Synchronous map engine.
//!
//! [`MapEngine`] wires the viewport debouncer, radius estimator, reconciler,
//! culling, dedup, marker layer and selection coordinator into one facade
//! driven by host events:
//!
//! ```text
//! viewport events ─► debouncer ─► poll() ─► SearchRequest ─► (host runs it)
//!                                                                  │
//!  markers(now) ◄─ marker layer ◄─ cull + dedupe ◄─ reconcile ◄─ apply_response()
//!        │
//!   taps ─► selection coordinator ─► details panel animator
//! ```
//!
//! The engine performs no I/O and reads no clock. Every time-dependent call
//! takes `now`, and [`MapEngine::next_deadline`] tells the host when to call
//! back.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::cull::ViewportCuller;
use crate::debounce::{ViewportDebouncer, ViewportEvent};
use crate::dedupe::GridDeduplicator;
use crate::geo::Region;
use crate::markers::{MarkerDescriptor, MarkerLayer};
use crate::model::{Cluster, Venue};
use crate::query::{QueryKey, SearchFilters, SearchQuery};
use crate::radius::ClusterRadiusEstimator;
use crate::reconcile::{reconcile, Reconciled};
use crate::search::{RequestSequencer, RequestTicket, SearchError, SearchResponse};
use crate::selection::{
    DetailsPanel, PanelAnimator, SelectionChange, SelectionController, SelectionCoordinator,
    SelectionEvent,
};

/// Programmatic instruction for the map surface.
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    AnimateToRegion { region: Region, duration: Duration },
}

/// A query the host should send to the search service.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub ticket: RequestTicket,
    pub query: SearchQuery,
}

/// What happened to a search response handed to the engine.
#[derive(Debug)]
pub enum ResponseOutcome {
    /// The result set replaced the previous one.
    Applied { venues: usize, clusters: usize },
    /// A newer request was issued since; the response was discarded.
    Superseded,
    /// The search failed; the previous result set stays visible.
    Failed(SearchError),
}

/// Result of tapping a venue marker.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueTap {
    pub selection: SelectionChange,
    pub command: Option<MapCommand>,
}

/// Single-threaded map engine.
pub struct MapEngine<C, A> {
    debouncer: ViewportDebouncer,
    estimator: ClusterRadiusEstimator,
    deduplicator: GridDeduplicator,
    culler: ViewportCuller,
    markers: MarkerLayer,
    selection: SelectionCoordinator<C, A>,
    sequencer: RequestSequencer,
    filters: SearchFilters,
    /// Region of the most recent settled viewport (or the initial region).
    settled: Region,
    last_key: Option<QueryKey>,
    results: Reconciled,
    page_limit: u32,
    cluster_zoom_delta: f64,
    map_animation: Duration,
}

impl<C: SelectionController, A: PanelAnimator> MapEngine<C, A> {
    pub fn new(config: EngineConfig, controller: C, animator: A) -> Self {
        Self {
            debouncer: ViewportDebouncer::new(config.initial_region, config.quiet_period),
            estimator: ClusterRadiusEstimator::new(config.radius),
            deduplicator: GridDeduplicator::new(config.dedupe),
            culler: config.culler,
            markers: MarkerLayer::new(config.render_gate, config.stagger()),
            selection: SelectionCoordinator::new(controller, animator),
            sequencer: RequestSequencer::new(),
            filters: SearchFilters::default(),
            settled: config.initial_region,
            last_key: None,
            results: Reconciled::default(),
            page_limit: config.page_limit,
            cluster_zoom_delta: config.cluster_zoom_delta,
            map_animation: config.map_animation,
        }
    }

    /// Issues the query for the initial region.
    pub fn start(&mut self) -> Option<SearchRequest> {
        info!(
            latitude = self.settled.latitude,
            longitude = self.settled.longitude,
            controlled = self.selection.is_controlled(),
            "Map engine started"
        );
        self.issue(self.settled)
    }

    // ---------------------------------------------------------------------
    // Viewport
    // ---------------------------------------------------------------------

    /// Feeds a map viewport event.
    ///
    /// A completion updates the rendered markers at once (culling and the
    /// dedup zoom gate see the new region); the search waits for [`poll`].
    ///
    /// [`poll`]: MapEngine::poll
    pub fn handle_viewport_event(&mut self, event: ViewportEvent, now: Instant) {
        self.debouncer.handle(event, now);
        if let ViewportEvent::ChangeCompleted(_) = event {
            self.refresh_markers(now);
        }
    }

    /// Emits a search request once the viewport has settled.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        let region = self.debouncer.poll(now)?;
        self.settled = region;
        self.issue(region)
    }

    /// Earliest moment the host should call [`poll`](MapEngine::poll) or
    /// re-read [`markers`](MapEngine::markers).
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        match (self.debouncer.deadline(), self.markers.next_gate_close(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ---------------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------------

    /// Replaces the filters and re-queries the settled region.
    pub fn set_filters(&mut self, filters: SearchFilters) -> Option<SearchRequest> {
        if filters == self.filters {
            return None;
        }
        self.filters = filters;
        self.issue(self.settled)
    }

    /// Hands a search result back to the engine.
    pub fn apply_response(
        &mut self,
        ticket: RequestTicket,
        result: Result<SearchResponse, SearchError>,
        now: Instant,
    ) -> ResponseOutcome {
        if !self.sequencer.is_current(ticket) {
            debug!(%ticket, "Discarding superseded search response");
            return ResponseOutcome::Superseded;
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.sequencer.settle(ticket);
                // Allow the same query to be retried on the next settle.
                self.last_key = None;
                self.debouncer.forget_emitted();
                warn!(%ticket, error = %e, "Search failed, keeping previous results");
                return ResponseOutcome::Failed(e);
            }
        };

        self.sequencer.accept(ticket);
        self.results = reconcile(response.entries);
        self.refresh_markers(now);

        debug!(
            %ticket,
            venues = self.results.venues.len(),
            clusters = self.results.clusters.len(),
            rendered = self.markers.len(),
            "Search results applied"
        );

        ResponseOutcome::Applied {
            venues: self.results.venues.len(),
            clusters: self.results.clusters.len(),
        }
    }

    // ---------------------------------------------------------------------
    // Taps
    // ---------------------------------------------------------------------

    /// Selects a venue from its marker and recenters on it, keeping the zoom.
    pub fn tap_venue(&mut self, venue_id: &str, now: Instant) -> VenueTap {
        let Some(venue) = self.results.venue(venue_id).cloned() else {
            debug!(venue_id, "Tap on unknown venue ignored");
            return VenueTap {
                selection: SelectionChange::Unchanged,
                command: None,
            };
        };

        let region = self.debouncer.current_region().recentered(venue.location);
        let selection = self.select(SelectionEvent::MarkerTapped(venue), now);

        VenueTap {
            selection,
            command: Some(MapCommand::AnimateToRegion {
                region,
                duration: self.map_animation,
            }),
        }
    }

    /// Zooms toward a cluster's center. Selection is untouched.
    pub fn tap_cluster(&mut self, cluster_id: &str) -> Option<MapCommand> {
        let cluster = self.results.cluster(cluster_id)?;
        debug!(cluster_id, count = cluster.count, "Cluster tapped");
        Some(MapCommand::AnimateToRegion {
            region: Region::around(cluster.center, self.cluster_zoom_delta),
            duration: self.map_animation,
        })
    }

    /// Selects a venue from a bottom-sheet row.
    pub fn tap_row(&mut self, venue_id: &str, now: Instant) -> SelectionChange {
        match self.results.venue(venue_id).cloned() {
            Some(venue) => self.select(SelectionEvent::RowTapped(venue), now),
            None => SelectionChange::Unchanged,
        }
    }

    pub fn tap_background(&mut self, now: Instant) -> SelectionChange {
        self.select(SelectionEvent::BackgroundTapped, now)
    }

    pub fn tap_close(&mut self, now: Instant) -> SelectionChange {
        self.select(SelectionEvent::CloseTapped, now)
    }

    /// Pushes the host-owned selection (controlled mode).
    pub fn set_external_selection(
        &mut self,
        selection: Option<Venue>,
        now: Instant,
    ) -> SelectionChange {
        let change = self.selection.set_external(selection);
        self.sync_selection_flags(now);
        change
    }

    pub fn panel_open_finished(&mut self) {
        self.selection.panel_mut().open_finished();
    }

    pub fn panel_close_finished(&mut self) {
        self.selection.panel_mut().close_finished();
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Marker descriptors with render-gate flags evaluated at `now`.
    pub fn markers(&self, now: Instant) -> Vec<MarkerDescriptor> {
        self.markers.descriptors(now)
    }

    /// Full venue list of the current result set (for the bottom sheet).
    pub fn venues(&self) -> &[Venue] {
        &self.results.venues
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.results.clusters
    }

    pub fn selected(&self) -> Option<&Venue> {
        self.selection.selection()
    }

    pub fn panel(&self) -> &DetailsPanel<A> {
        self.selection.panel()
    }

    pub fn panel_mut(&mut self) -> &mut DetailsPanel<A> {
        self.selection.panel_mut()
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    /// Latest completed viewport, including one still waiting to settle.
    pub fn current_region(&self) -> Region {
        self.debouncer.current_region()
    }

    pub fn settled_region(&self) -> Region {
        self.settled
    }

    pub fn is_changing(&self) -> bool {
        self.debouncer.is_changing()
    }

    pub fn is_search_in_flight(&self) -> bool {
        self.sequencer.in_flight()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn issue(&mut self, region: Region) -> Option<SearchRequest> {
        let radius = self.estimator.estimate(&region);
        let query =
            SearchQuery::for_region(&region, radius, &self.filters).with_limit(self.page_limit);
        let key = query.key();

        if self.last_key.as_ref() == Some(&key) {
            debug!(%key, "Query unchanged, not re-issued");
            return None;
        }

        let ticket = self.sequencer.begin();
        self.last_key = Some(key);
        debug!(
            %ticket,
            latitude = query.latitude,
            longitude = query.longitude,
            radius_meters = query.radius_meters,
            "Search issued"
        );
        Some(SearchRequest { ticket, query })
    }

    fn select(&mut self, event: SelectionEvent, now: Instant) -> SelectionChange {
        let change = self.selection.handle(event);
        self.sync_selection_flags(now);
        change
    }

    fn sync_selection_flags(&mut self, now: Instant) {
        let selected = self.selection.selection().map(|v| v.id.as_str());
        self.markers.select(selected, now);
    }

    fn refresh_markers(&mut self, now: Instant) {
        let region = self.debouncer.current_region();
        let visible = self.culler.visible(&self.results.venues, &region);
        let deduped = self.deduplicator.dedupe(&visible, &region);
        let rendered = self.culler.cap(deduped);
        let selected = self.selection.selection().map(|v| v.id.as_str());

        self.markers
            .sync(&rendered, &self.results.clusters, selected, now);
    }
}
