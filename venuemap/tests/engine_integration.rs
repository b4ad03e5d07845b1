//! Integration tests for the synchronous map engine.
//!
//! These tests drive [`MapEngine`] through its public API only:
//! - Viewport gesture → settled query → response → rendered markers
//! - Dedup zoom gate reacting to a completed zoom before any new response
//! - Selection no-op, replace and clear, observed through the panel animator
//! - Controlled selection forwarding requests to the host
//!
//! Run with: `cargo test --test engine_integration`

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::json;

use venuemap::config::EngineConfig;
use venuemap::debounce::ViewportEvent;
use venuemap::engine::{MapEngine, ResponseOutcome, SearchRequest};
use venuemap::geo::Region;
use venuemap::markers::{MarkerDescriptor, MarkerKind};
use venuemap::model::Venue;
use venuemap::search::{parse_search_response, SearchResponse};
use venuemap::selection::{
    ExternalController, InternalController, PanelCommand, QueuedAnimator, SelectionChange,
};

// ============================================================================
// Test Helpers
// ============================================================================

type Engine = MapEngine<InternalController, QueuedAnimator>;

fn create_engine() -> Engine {
    MapEngine::new(
        EngineConfig::default(),
        InternalController::new(),
        QueuedAnimator::new(),
    )
}

fn region(lat: f64, lng: f64, delta: f64) -> Region {
    Region::new(lat, lng, delta, delta).unwrap()
}

/// Response with two venues sharing a grid cell, one standalone venue, a
/// real cluster, a singleton cluster and a malformed cluster.
fn overlapping_response() -> SearchResponse {
    let body = json!({
        "response": {
            "clusters": [
                {"count": 1, "venue": {"id": "a", "name": "Alpha", "location": {"type": "Point", "coordinates": [44.50012, 40.10012]}}},
                {"count": 1, "venue": {"id": "b", "name": "Bravo", "location": {"type": "Point", "coordinates": [44.50018, 40.10018]}}},
                {"count": 1, "venue": {"id": "c", "name": "Charlie", "location": {"type": "Point", "coordinates": ["44.52", "40.12"]}}},
                {"id": "k1", "count": 8, "center": {"latitude": 40.2, "longitude": 44.6}},
                {"count": 3, "center": {}}
            ],
            "total": 13
        }
    });
    parse_search_response(body.to_string().as_bytes()).unwrap()
}

fn venue_keys(markers: &[MarkerDescriptor]) -> Vec<String> {
    let mut keys: Vec<String> = markers
        .iter()
        .filter(|m| matches!(m.kind, MarkerKind::Venue { .. }))
        .map(|m| m.key.clone())
        .collect();
    keys.sort();
    keys
}

fn gesture(engine: &mut Engine, to: Region, at: Instant) {
    engine.handle_viewport_event(ViewportEvent::ChangeStarted, at);
    engine.handle_viewport_event(ViewportEvent::Changing(to), at);
    engine.handle_viewport_event(ViewportEvent::ChangeCompleted(to), at);
}

fn loaded_engine(t0: Instant) -> Engine {
    let mut engine = create_engine();
    let SearchRequest { ticket, .. } = engine.start().unwrap();
    let outcome = engine.apply_response(ticket, Ok(overlapping_response()), t0);
    assert!(matches!(
        outcome,
        ResponseOutcome::Applied {
            venues: 3,
            clusters: 1
        }
    ));
    engine
}

// ============================================================================
// Viewport → query → markers
// ============================================================================

#[test]
fn test_wide_view_dedupes_overlapping_venues() {
    let t0 = Instant::now();
    let engine = loaded_engine(t0);

    let markers = engine.markers(t0);
    assert_eq!(venue_keys(&markers), vec!["venue-a", "venue-c"]);
    assert!(markers.iter().any(|m| m.key == "cluster-k1-8"));

    // Dedup only affects rendering; the list still has every venue.
    assert_eq!(engine.venues().len(), 3);
}

#[test]
fn test_zoom_in_disables_dedup_before_new_results() {
    let t0 = Instant::now();
    let mut engine = loaded_engine(t0);

    let zoomed = region(40.1, 44.5, 0.003);
    gesture(&mut engine, zoomed, t0);

    // The completed region is visible synchronously.
    assert_eq!(engine.current_region(), zoomed);
    assert_eq!(venue_keys(&engine.markers(t0)), vec!["venue-a", "venue-b"]);

    // The query itself waits for the quiet period.
    assert!(engine.poll(t0 + Duration::from_millis(100)).is_none());
    let request = engine.poll(t0 + Duration::from_millis(150)).unwrap();
    assert_eq!(request.query.latitude, 40.1);
    let expected_radius = 0.003 * 40_075_000.0 / 360.0 / 2.0 * 0.5;
    assert!((request.query.radius_meters - expected_radius).abs() < 1e-6);
}

#[test]
fn test_gesture_restart_emits_only_final_region() {
    let t0 = Instant::now();
    let mut engine = create_engine();
    engine.start();

    gesture(&mut engine, region(41.0, 45.0, 0.5), t0);
    let t1 = t0 + Duration::from_millis(100);
    gesture(&mut engine, region(42.0, 46.0, 0.5), t1);

    assert!(engine.poll(t0 + Duration::from_millis(150)).is_none());
    let request = engine.poll(t1 + Duration::from_millis(150)).unwrap();
    assert_eq!(request.query.latitude, 42.0);
    assert!(engine.poll(t1 + Duration::from_secs(5)).is_none());
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_retap_does_not_restart_open_animation() {
    let t0 = Instant::now();
    let mut engine = loaded_engine(t0);

    engine.tap_venue("a", t0);
    let second = engine.tap_venue("a", t0);
    assert_eq!(second.selection, SelectionChange::Unchanged);
    assert!(second.command.is_some(), "Recentering still happens");

    assert_eq!(
        engine.panel_mut().animator_mut().drain(),
        vec![PanelCommand::Open]
    );
}

#[test]
fn test_replace_keeps_panel_open() {
    let t0 = Instant::now();
    let mut engine = loaded_engine(t0);

    engine.tap_venue("a", t0);
    engine.panel_open_finished();
    let change = engine.tap_row("c", t0);

    assert!(matches!(change, SelectionChange::Replaced { .. }));
    assert_eq!(
        engine.panel_mut().animator_mut().drain(),
        vec![PanelCommand::Open]
    );
    assert_eq!(engine.panel().content().map(|v| v.id.as_str()), Some("c"));

    let selected: Vec<String> = engine
        .markers(t0)
        .into_iter()
        .filter(|m| m.selected)
        .map(|m| m.key)
        .collect();
    assert_eq!(selected, vec!["venue-c"]);
}

#[test]
fn test_close_then_unmount() {
    let t0 = Instant::now();
    let mut engine = loaded_engine(t0);

    engine.tap_venue("c", t0);
    engine.panel_open_finished();
    assert!(matches!(engine.tap_close(t0), SelectionChange::Cleared(_)));
    assert_eq!(
        engine.panel_mut().animator_mut().drain(),
        vec![PanelCommand::Open, PanelCommand::Close]
    );
    assert!(engine.panel().content().is_some());

    engine.panel_close_finished();
    assert!(engine.panel().content().is_none());
}

#[test]
fn test_selection_reopens_render_gate() {
    let t0 = Instant::now();
    let mut engine = loaded_engine(t0);

    let later = t0 + Duration::from_secs(2);
    assert!(engine.markers(later).iter().all(|m| !m.tracks_view_changes));

    engine.tap_venue("c", later);
    let markers = engine.markers(later);
    let flagged: Vec<&str> = markers
        .iter()
        .filter(|m| m.tracks_view_changes)
        .map(|m| m.key.as_str())
        .collect();
    assert_eq!(flagged, vec!["venue-c"]);
}

#[test]
fn test_controlled_selection_waits_for_host() {
    let requests: Arc<Mutex<Vec<Option<String>>>> = Arc::default();
    let sink = Arc::clone(&requests);
    let controller = ExternalController::new(None, move |venue: Option<&Venue>| {
        sink.lock().unwrap().push(venue.map(|v| v.id.clone()));
    });
    let mut engine = MapEngine::new(EngineConfig::default(), controller, QueuedAnimator::new());

    let t0 = Instant::now();
    let request = engine.start().unwrap();
    engine.apply_response(request.ticket, Ok(overlapping_response()), t0);

    let tap = engine.tap_venue("a", t0);
    assert_eq!(tap.selection, SelectionChange::Unchanged);
    assert!(engine.selected().is_none());
    assert_eq!(*requests.lock().unwrap(), vec![Some("a".to_string())]);

    let host_choice = engine.venues().iter().find(|v| v.id == "a").cloned();
    let change = engine.set_external_selection(host_choice, t0);
    assert!(matches!(change, SelectionChange::Selected(_)));
    assert_eq!(engine.selected().map(|v| v.id.as_str()), Some("a"));
}
