//! Replay command - drive the engine from a recorded scenario.
//!
//! A scenario is a list of timed host events. Time is virtual: each step
//! runs at `start + at_ms`, and any settled viewport that comes due before
//! a step is issued first, so debounce behaviour is reproduced exactly.
//!
//! ```json
//! {
//!   "controlled": false,
//!   "steps": [
//!     {"at_ms": 0,   "action": "respond", "body": {"response": {"clusters": []}}},
//!     {"at_ms": 10,  "action": "viewport", "event": {"type": "change_started"}},
//!     {"at_ms": 400, "action": "viewport", "event": {"type": "change_completed",
//!         "region": {"latitude": 40.18, "longitude": 44.5,
//!                    "latitudeDelta": 0.05, "longitudeDelta": 0.05}}},
//!     {"at_ms": 900, "action": "tap_venue", "id": "v1"}
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use venuemap::config::EngineConfig;
use venuemap::debounce::ViewportEvent;
use venuemap::engine::{MapCommand, MapEngine, ResponseOutcome, SearchRequest};
use venuemap::geo::Region;
use venuemap::markers::MarkerDescriptor;
use venuemap::model::Venue;
use venuemap::query::{SearchFilters, SearchQuery};
use venuemap::search::{parse_search_response, RequestTicket, SearchError};
use venuemap::selection::{
    ExternalController, InternalController, PanelCommand, QueuedAnimator, SelectionController,
};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the replay command.
pub struct ReplayArgs {
    pub scenario: PathBuf,
    pub pretty: bool,
    pub config: Option<PathBuf>,
    pub debug: bool,
}

/// A recorded session.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Run with a host-owned (controlled) selection.
    #[serde(default)]
    pub controlled: bool,
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

/// One host event.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Viewport {
        event: ViewportEvent,
    },
    /// Answer an issued request (default: the latest) with a response body.
    Respond {
        #[serde(default)]
        request: Option<usize>,
        body: Value,
    },
    /// Fail an issued request (default: the latest).
    Fail {
        #[serde(default)]
        request: Option<usize>,
    },
    TapVenue {
        id: String,
    },
    TapCluster {
        id: String,
    },
    TapRow {
        id: String,
    },
    TapBackground,
    TapClose,
    Filters {
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        categories: Vec<String>,
    },
    PanelOpenFinished,
    PanelCloseFinished,
    /// Host pushes its selection (controlled scenarios).
    HostSelect {
        #[serde(default)]
        id: Option<String>,
    },
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Viewport { .. } => "viewport",
            Action::Respond { .. } => "respond",
            Action::Fail { .. } => "fail",
            Action::TapVenue { .. } => "tap_venue",
            Action::TapCluster { .. } => "tap_cluster",
            Action::TapRow { .. } => "tap_row",
            Action::TapBackground => "tap_background",
            Action::TapClose => "tap_close",
            Action::Filters { .. } => "filters",
            Action::PanelOpenFinished => "panel_open_finished",
            Action::PanelCloseFinished => "panel_close_finished",
            Action::HostSelect { .. } => "host_select",
        }
    }
}

/// Query issued during the replay.
#[derive(Debug, Serialize)]
pub struct IssuedQuery {
    /// Index usable as `request` in later steps.
    pub request: usize,
    pub ticket: u64,
    #[serde(flatten)]
    pub query: SearchQuery,
}

#[derive(Debug, Serialize)]
pub struct CommandRecord {
    pub region: Region,
    pub duration_ms: u64,
}

/// What one step produced.
#[derive(Debug, Serialize)]
pub struct StepRecord {
    pub at_ms: u64,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issued: Vec<IssuedQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub panel: Vec<&'static str>,
    pub selected: Option<String>,
    pub rendered: usize,
}

impl StepRecord {
    fn new(at_ms: u64, action: &'static str) -> Self {
        Self {
            at_ms,
            action,
            issued: Vec::new(),
            outcome: None,
            command: None,
            panel: Vec::new(),
            selected: None,
            rendered: 0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepRecord>,
    /// Markers after the last step.
    pub markers: Vec<MarkerDescriptor>,
    pub selected: Option<String>,
    /// Selection requests forwarded to the host (controlled scenarios).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub host_requests: Vec<Option<String>>,
}

/// Run the replay command.
pub fn run(args: ReplayArgs) -> Result<(), CliError> {
    let scenario = load_scenario(&args.scenario)?;

    let runner = CliRunner::new(args.config.as_deref(), args.debug)?;
    runner.log_startup("replay");

    let report = run_scenario(scenario, runner.engine_config());

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(CliError::Output)?;
    println!("{}", json);

    Ok(())
}

/// Reads and parses a scenario file.
pub fn load_scenario(path: &Path) -> Result<Scenario, CliError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|error| CliError::ScenarioRead {
        path: display.clone(),
        error,
    })?;
    serde_json::from_str(&content).map_err(|error| CliError::ScenarioParse {
        path: display,
        error,
    })
}

/// Replays a scenario on a fresh engine.
pub fn run_scenario(scenario: Scenario, config: &EngineConfig) -> ReplayReport {
    if scenario.controlled {
        let requests: Arc<Mutex<Vec<Option<String>>>> = Arc::default();
        let sink = Arc::clone(&requests);
        let controller = ExternalController::new(None, move |venue: Option<&Venue>| {
            if let Ok(mut sink) = sink.lock() {
                sink.push(venue.map(|v| v.id.clone()));
            }
        });
        let mut report = Replay::new(config, controller).run(scenario.steps);
        report.host_requests = requests.lock().map(|r| r.clone()).unwrap_or_default();
        report
    } else {
        Replay::new(config, InternalController::new()).run(scenario.steps)
    }
}

struct Replay<C> {
    engine: MapEngine<C, QueuedAnimator>,
    base: Instant,
    tickets: Vec<RequestTicket>,
    records: Vec<StepRecord>,
}

impl<C: SelectionController> Replay<C> {
    fn new(config: &EngineConfig, controller: C) -> Self {
        Self {
            engine: MapEngine::new(config.clone(), controller, QueuedAnimator::new()),
            base: Instant::now(),
            tickets: Vec::new(),
            records: Vec::new(),
        }
    }

    fn run(mut self, steps: Vec<Step>) -> ReplayReport {
        let mut record = StepRecord::new(0, "start");
        if let Some(request) = self.engine.start() {
            record.issued.push(self.track(request));
        }
        self.finish(record, self.base);

        let mut last_ms = 0;
        for step in steps {
            last_ms = last_ms.max(step.at_ms);
            let now = self.at(step.at_ms);
            self.settle(step.at_ms);

            let mut record = StepRecord::new(step.at_ms, step.action.name());
            self.apply(step.action, now, &mut record);
            self.finish(record, now);
        }

        // Flush a viewport still waiting out its quiet period.
        let end_ms = last_ms + 10_000;
        self.settle(end_ms);
        let end = self.at(end_ms);

        ReplayReport {
            markers: self.engine.markers(end),
            selected: self.engine.selected().map(|v| v.id.clone()),
            steps: self.records,
            host_requests: Vec::new(),
        }
    }

    fn at(&self, ms: u64) -> Instant {
        self.base + Duration::from_millis(ms)
    }

    /// Issues a settled viewport that came due by `ms`.
    fn settle(&mut self, ms: u64) {
        let now = self.at(ms);
        let Some(deadline) = self.engine.next_deadline(now) else {
            return;
        };
        if deadline > now {
            return;
        }
        if let Some(request) = self.engine.poll(now) {
            let offset = deadline.saturating_duration_since(self.base).as_millis() as u64;
            let mut record = StepRecord::new(offset, "settle");
            record.issued.push(self.track(request));
            self.finish(record, now);
        }
    }

    fn apply(&mut self, action: Action, now: Instant, record: &mut StepRecord) {
        match action {
            Action::Viewport { event } => self.engine.handle_viewport_event(event, now),
            Action::Respond { request, body } => {
                let result = parse_search_response(body.to_string().as_bytes());
                record.outcome = Some(self.respond(request, result, now));
            }
            Action::Fail { request } => {
                let result = Err(SearchError::Http("scripted failure".to_string()));
                record.outcome = Some(self.respond(request, result, now));
            }
            Action::TapVenue { id } => {
                let tap = self.engine.tap_venue(&id, now);
                record.command = tap.command.map(command_record);
            }
            Action::TapCluster { id } => {
                record.command = self.engine.tap_cluster(&id).map(command_record);
            }
            Action::TapRow { id } => {
                self.engine.tap_row(&id, now);
            }
            Action::TapBackground => {
                self.engine.tap_background(now);
            }
            Action::TapClose => {
                self.engine.tap_close(now);
            }
            Action::Filters { query, categories } => {
                let mut filters = SearchFilters::new();
                if let Some(query) = query {
                    filters.set_query(query);
                }
                filters.categories.extend(categories);
                if let Some(request) = self.engine.set_filters(filters) {
                    record.issued.push(self.track(request));
                }
            }
            Action::PanelOpenFinished => self.engine.panel_open_finished(),
            Action::PanelCloseFinished => self.engine.panel_close_finished(),
            Action::HostSelect { id } => {
                let venue = id.and_then(|id| self.engine.venues().iter().find(|v| v.id == id).cloned());
                self.engine.set_external_selection(venue, now);
            }
        }
    }

    fn respond(
        &mut self,
        request: Option<usize>,
        result: Result<venuemap::search::SearchResponse, SearchError>,
        now: Instant,
    ) -> String {
        let ticket = match request {
            Some(index) => self.tickets.get(index).copied(),
            None => self.tickets.last().copied(),
        };
        let Some(ticket) = ticket else {
            return "no such request".to_string();
        };

        match self.engine.apply_response(ticket, result, now) {
            ResponseOutcome::Applied { venues, clusters } => {
                format!("applied ({} venues, {} clusters)", venues, clusters)
            }
            ResponseOutcome::Superseded => "superseded".to_string(),
            ResponseOutcome::Failed(e) => format!("failed: {}", e),
        }
    }

    fn track(&mut self, request: SearchRequest) -> IssuedQuery {
        self.tickets.push(request.ticket);
        IssuedQuery {
            request: self.tickets.len() - 1,
            ticket: request.ticket.value(),
            query: request.query,
        }
    }

    fn finish(&mut self, mut record: StepRecord, now: Instant) {
        record.panel = self
            .engine
            .panel_mut()
            .animator_mut()
            .drain()
            .into_iter()
            .map(|command| match command {
                PanelCommand::Open => "open",
                PanelCommand::Close => "close",
            })
            .collect();
        record.selected = self.engine.selected().map(|v| v.id.clone());
        record.rendered = self.engine.markers(now).len();
        self.records.push(record);
    }
}

fn command_record(command: MapCommand) -> CommandRecord {
    match command {
        MapCommand::AnimateToRegion { region, duration } => CommandRecord {
            region,
            duration_ms: duration.as_millis() as u64,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(json: &str) -> Scenario {
        serde_json::from_str(json).unwrap()
    }

    const BODY: &str = r#"{"response": {"clusters": [
        {"count": 1, "venue": {"id": "v1", "name": "Pool", "location": {"coordinates": [44.50, 40.18]}}},
        {"count": 1, "venue": {"id": "v2", "name": "Gym", "location": {"coordinates": [44.51, 40.18]}}},
        {"id": "k", "count": 9, "center": {"latitude": 40.2, "longitude": 44.6}}
    ]}}"#;

    fn with_body(steps: &str) -> String {
        format!(
            r#"{{"steps": [{{"at_ms": 0, "action": "respond", "body": {}}}, {}]}}"#,
            BODY, steps
        )
    }

    #[test]
    fn test_start_issues_initial_query() {
        let report = run_scenario(scenario(r#"{"steps": []}"#), &EngineConfig::default());
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].action, "start");
        assert_eq!(report.steps[0].issued.len(), 1);
        assert_eq!(report.steps[0].issued[0].query.limit, 100);
    }

    #[test]
    fn test_response_and_tap() {
        let json = with_body(r#"{"at_ms": 50, "action": "tap_venue", "id": "v2"}"#);
        let report = run_scenario(scenario(&json), &EngineConfig::default());

        let respond = &report.steps[1];
        assert_eq!(respond.outcome.as_deref(), Some("applied (2 venues, 1 clusters)"));
        assert_eq!(respond.rendered, 3);

        let tap = &report.steps[2];
        assert_eq!(tap.selected.as_deref(), Some("v2"));
        assert_eq!(tap.panel, vec!["open"]);
        let command = tap.command.as_ref().unwrap();
        assert_eq!(command.duration_ms, 300);
        assert_eq!(command.region.longitude_delta, 1.5);

        assert_eq!(report.selected.as_deref(), Some("v2"));
        assert!(report.markers.iter().any(|m| m.key == "venue-v2" && m.selected));
    }

    #[test]
    fn test_gesture_settles_once() {
        let json = with_body(
            r#"{"at_ms": 100, "action": "viewport", "event": {"type": "change_started"}},
               {"at_ms": 120, "action": "viewport", "event": {"type": "changing", "region": {"latitude": 40.1, "longitude": 44.4, "latitudeDelta": 0.2, "longitudeDelta": 0.2}}},
               {"at_ms": 200, "action": "viewport", "event": {"type": "change_completed", "region": {"latitude": 40.2, "longitude": 44.5, "latitudeDelta": 0.2, "longitudeDelta": 0.2}}},
               {"at_ms": 1000, "action": "tap_background"}"#,
        );
        let report = run_scenario(scenario(&json), &EngineConfig::default());

        let settles: Vec<&StepRecord> = report
            .steps
            .iter()
            .filter(|s| s.action == "settle")
            .collect();
        assert_eq!(settles.len(), 1);
        assert_eq!(settles[0].at_ms, 350);
        assert_eq!(settles[0].issued[0].query.latitude, 40.2);
        assert_eq!(settles[0].issued[0].request, 1);
    }

    #[test]
    fn test_stale_response_is_superseded() {
        let json = format!(
            r#"{{"steps": [
                {{"at_ms": 0, "action": "filters", "categories": ["yoga"]}},
                {{"at_ms": 10, "action": "respond", "request": 0, "body": {body}}},
                {{"at_ms": 20, "action": "respond", "request": 1, "body": {body}}}
            ]}}"#,
            body = BODY
        );
        let report = run_scenario(scenario(&json), &EngineConfig::default());

        assert_eq!(report.steps[2].outcome.as_deref(), Some("superseded"));
        assert_eq!(report.steps[2].rendered, 0);
        assert!(report.steps[3]
            .outcome
            .as_deref()
            .unwrap()
            .starts_with("applied"));
    }

    #[test]
    fn test_failure_keeps_markers() {
        let json = with_body(
            r#"{"at_ms": 10, "action": "filters", "query": "spa"},
               {"at_ms": 20, "action": "fail"}"#,
        );
        let report = run_scenario(scenario(&json), &EngineConfig::default());

        let fail = report.steps.last().unwrap();
        assert!(fail.outcome.as_deref().unwrap().starts_with("failed"));
        assert_eq!(fail.rendered, 3);
    }

    #[test]
    fn test_controlled_scenario_forwards_requests() {
        let json = format!(
            r#"{{"controlled": true, "steps": [
                {{"at_ms": 0, "action": "respond", "body": {}}},
                {{"at_ms": 10, "action": "tap_venue", "id": "v1"}},
                {{"at_ms": 20, "action": "host_select", "id": "v1"}}
            ]}}"#,
            BODY
        );
        let report = run_scenario(scenario(&json), &EngineConfig::default());

        assert_eq!(report.host_requests, vec![Some("v1".to_string())]);
        assert_eq!(report.steps[2].selected, None);
        assert_eq!(report.steps[3].selected.as_deref(), Some("v1"));
        assert_eq!(report.steps[3].panel, vec!["open"]);
    }

    #[test]
    fn test_load_scenario_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        std::fs::write(&path, with_body(r#"{"at_ms": 5, "action": "tap_row", "id": "v1"}"#))
            .unwrap();

        let scenario = load_scenario(&path).unwrap();
        assert_eq!(scenario.steps.len(), 2);

        let report = run_scenario(scenario, &EngineConfig::default());
        assert_eq!(report.selected.as_deref(), Some("v1"));
    }

    #[test]
    fn test_load_scenario_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_scenario(&missing),
            Err(CliError::ScenarioRead { .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, r#"{"steps": [{"action": "warp"}]}"#).unwrap();
        assert!(matches!(
            load_scenario(&broken),
            Err(CliError::ScenarioParse { .. })
        ));
    }

    #[test]
    fn test_unknown_request_index() {
        let json = r#"{"steps": [{"at_ms": 0, "action": "fail", "request": 7}]}"#;
        let report = run_scenario(scenario(json), &EngineConfig::default());
        assert_eq!(report.steps[1].outcome.as_deref(), Some("no such request"));
    }
}
