//! Selection coordinator: the single owner of "which venue is selected".

use tracing::debug;

use super::controller::SelectionController;
use super::panel::{DetailsPanel, PanelAnimator};
use crate::model::Venue;

/// User interactions that affect the selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// A venue marker on the map was tapped.
    MarkerTapped(Venue),
    /// A row in the bottom-sheet list was tapped.
    RowTapped(Venue),
    /// The map background was tapped.
    BackgroundTapped,
    /// The details panel close button was tapped.
    CloseTapped,
}

impl SelectionEvent {
    fn target(self) -> Option<Venue> {
        match self {
            SelectionEvent::MarkerTapped(venue) | SelectionEvent::RowTapped(venue) => Some(venue),
            SelectionEvent::BackgroundTapped | SelectionEvent::CloseTapped => None,
        }
    }
}

/// Observable outcome of an event.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionChange {
    /// Nothing observable changed (re-tap, idle background tap, or a request
    /// forwarded to a controlling host).
    Unchanged,
    /// Idle → Selected.
    Selected(Venue),
    /// Selected(previous) → Selected(current), panel kept open.
    Replaced { previous: Venue, current: Venue },
    /// Selected → Idle.
    Cleared(Venue),
}

/// Serializes selection changes and drives the details panel.
///
/// Events are processed strictly in arrival order, so two taps landing in
/// the same frame resolve to the last one.
#[derive(Debug)]
pub struct SelectionCoordinator<C, A> {
    controller: C,
    panel: DetailsPanel<A>,
    /// Selection the panel currently reflects.
    observed: Option<Venue>,
}

impl<C: SelectionController, A: PanelAnimator> SelectionCoordinator<C, A> {
    pub fn new(controller: C, animator: A) -> Self {
        let mut coordinator = Self {
            controller,
            panel: DetailsPanel::new(animator),
            observed: None,
        };
        // A controlled host may start with a selection already in place.
        coordinator.apply();
        coordinator
    }

    /// Handles one interaction.
    pub fn handle(&mut self, event: SelectionEvent) -> SelectionChange {
        let next = event.target();

        if same_selection(self.controller.current(), next.as_ref()) {
            debug!(
                venue_id = next.as_ref().map(|v| v.id.as_str()),
                "Selection unchanged, event ignored"
            );
            return SelectionChange::Unchanged;
        }

        self.controller.request(next.as_ref());
        self.apply()
    }

    /// Pushes the host-owned selection (controlled mode only).
    pub fn set_external(&mut self, selection: Option<Venue>) -> SelectionChange {
        if self.controller.reflect(selection) {
            self.apply()
        } else {
            SelectionChange::Unchanged
        }
    }

    pub fn selection(&self) -> Option<&Venue> {
        self.controller.current()
    }

    pub fn is_controlled(&self) -> bool {
        self.controller.is_controlled()
    }

    pub fn panel(&self) -> &DetailsPanel<A> {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut DetailsPanel<A> {
        &mut self.panel
    }

    /// Reconciles the panel with the controller's current selection.
    fn apply(&mut self) -> SelectionChange {
        let current = self.controller.current().cloned();

        let change = match (self.observed.take(), current.clone()) {
            (None, None) => SelectionChange::Unchanged,
            (None, Some(venue)) => {
                self.panel.show(venue.clone());
                SelectionChange::Selected(venue)
            }
            (Some(previous), Some(venue)) if previous.same_as(&venue) => {
                self.panel.show(venue);
                SelectionChange::Unchanged
            }
            (Some(previous), Some(venue)) => {
                self.panel.show(venue.clone());
                SelectionChange::Replaced {
                    previous,
                    current: venue,
                }
            }
            (Some(previous), None) => {
                self.panel.hide();
                SelectionChange::Cleared(previous)
            }
        };

        self.observed = current;

        if change != SelectionChange::Unchanged {
            debug!(
                selected = self.observed.as_ref().map(|v| v.id.as_str()),
                controlled = self.controller.is_controlled(),
                "Selection changed"
            );
        }

        change
    }
}

fn same_selection(a: Option<&Venue>, b: Option<&Venue>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same_as(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::geo::GeoPoint;
    use crate::selection::{
        ExternalController, InternalController, PanelCommand, PanelPhase, QueuedAnimator,
    };

    /// Animator that counts calls.
    #[derive(Debug, Default)]
    struct CountingAnimator {
        opens: usize,
        closes: usize,
    }

    impl PanelAnimator for CountingAnimator {
        fn animate_open(&mut self) {
            self.opens += 1;
        }

        fn animate_close(&mut self) {
            self.closes += 1;
        }
    }

    fn venue(id: &str) -> Venue {
        Venue::new(id, id, GeoPoint::new(40.0, 44.0))
    }

    fn uncontrolled() -> SelectionCoordinator<InternalController, CountingAnimator> {
        SelectionCoordinator::new(InternalController::new(), CountingAnimator::default())
    }

    #[test]
    fn test_tap_selects_and_opens_panel() {
        let mut c = uncontrolled();
        let change = c.handle(SelectionEvent::MarkerTapped(venue("a")));

        assert_eq!(change, SelectionChange::Selected(venue("a")));
        assert_eq!(c.selection().map(|v| v.id.as_str()), Some("a"));
        assert_eq!(c.panel().phase(), PanelPhase::Opening);
        assert_eq!(c.panel().animator().opens, 1);
    }

    #[test]
    fn test_retap_same_venue_is_noop() {
        let mut c = uncontrolled();
        c.handle(SelectionEvent::MarkerTapped(venue("a")));
        c.panel_mut().open_finished();

        let change = c.handle(SelectionEvent::MarkerTapped(venue("a")));
        assert_eq!(change, SelectionChange::Unchanged);
        assert_eq!(c.panel().animator().opens, 1);
        assert_eq!(c.panel().phase(), PanelPhase::Open);
    }

    #[test]
    fn test_tap_other_venue_replaces_without_closing() {
        let mut c = uncontrolled();
        c.handle(SelectionEvent::MarkerTapped(venue("a")));

        let change = c.handle(SelectionEvent::RowTapped(venue("b")));
        assert_eq!(
            change,
            SelectionChange::Replaced {
                previous: venue("a"),
                current: venue("b"),
            }
        );
        assert_eq!(c.panel().animator().closes, 0);
        assert_eq!(c.panel().animator().opens, 1);
        assert_ne!(c.panel().phase(), PanelPhase::Hidden);
        assert_eq!(c.panel().content().map(|v| v.id.as_str()), Some("b"));
    }

    #[test]
    fn test_background_and_close_taps_clear() {
        let mut c = uncontrolled();
        c.handle(SelectionEvent::MarkerTapped(venue("a")));
        assert_eq!(
            c.handle(SelectionEvent::BackgroundTapped),
            SelectionChange::Cleared(venue("a"))
        );
        assert!(c.selection().is_none());
        assert_eq!(c.panel().phase(), PanelPhase::Closing);

        c.handle(SelectionEvent::MarkerTapped(venue("b")));
        assert_eq!(
            c.handle(SelectionEvent::CloseTapped),
            SelectionChange::Cleared(venue("b"))
        );
    }

    #[test]
    fn test_background_tap_when_idle_is_noop() {
        let mut c = uncontrolled();
        assert_eq!(
            c.handle(SelectionEvent::BackgroundTapped),
            SelectionChange::Unchanged
        );
        assert_eq!(c.panel().animator().closes, 0);
    }

    #[test]
    fn test_last_tap_wins() {
        let mut c = uncontrolled();
        c.handle(SelectionEvent::MarkerTapped(venue("a")));
        c.handle(SelectionEvent::MarkerTapped(venue("b")));
        assert_eq!(c.selection().map(|v| v.id.as_str()), Some("b"));
    }

    #[test]
    fn test_controlled_mode_forwards_and_reflects() {
        let requests: Arc<Mutex<Vec<Option<String>>>> = Arc::default();
        let sink = Arc::clone(&requests);
        let controller = ExternalController::new(None, move |v: Option<&Venue>| {
            sink.lock().unwrap().push(v.map(|v| v.id.clone()));
        });
        let mut c = SelectionCoordinator::new(controller, QueuedAnimator::new());

        let change = c.handle(SelectionEvent::MarkerTapped(venue("a")));
        assert_eq!(change, SelectionChange::Unchanged, "Host has not applied it yet");
        assert!(c.selection().is_none());
        assert_eq!(*requests.lock().unwrap(), vec![Some("a".to_string())]);

        let change = c.set_external(Some(venue("a")));
        assert_eq!(change, SelectionChange::Selected(venue("a")));
        assert_eq!(c.panel_mut().animator_mut().drain(), vec![PanelCommand::Open]);

        c.handle(SelectionEvent::CloseTapped);
        assert_eq!(
            *requests.lock().unwrap(),
            vec![Some("a".to_string()), None]
        );
        assert!(c.selection().is_some(), "Still selected until the host says so");
    }

    #[test]
    fn test_controlled_initial_selection_opens_panel() {
        let controller = ExternalController::new(Some(venue("a")), |_| {});
        let c = SelectionCoordinator::new(controller, CountingAnimator::default());
        assert_eq!(c.panel().phase(), PanelPhase::Opening);
        assert!(c.is_controlled());
    }

    #[test]
    fn test_uncontrolled_ignores_host_pushes() {
        let mut c = uncontrolled();
        assert_eq!(c.set_external(Some(venue("a"))), SelectionChange::Unchanged);
        assert!(c.selection().is_none());
    }
}
