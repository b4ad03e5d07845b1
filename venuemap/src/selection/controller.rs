//! Selection ownership strategies.

use std::fmt;

use tracing::trace;

use crate::model::Venue;

/// Decides who owns the selected venue.
pub trait SelectionController: Send {
    /// Selection currently in effect.
    fn current(&self) -> Option<&Venue>;

    /// Asks for the selection to become `next`.
    ///
    /// An uncontrolled implementation applies it; a controlled one forwards it
    /// to the host and waits for [`SelectionController::reflect`].
    fn request(&mut self, next: Option<&Venue>);

    /// Host-pushed selection. Returns `true` if it was applied.
    fn reflect(&mut self, selection: Option<Venue>) -> bool;

    /// Whether the host owns the selection.
    fn is_controlled(&self) -> bool;
}

/// Uncontrolled mode: the coordinator owns the selection.
#[derive(Debug, Default)]
pub struct InternalController {
    selected: Option<Venue>,
}

impl InternalController {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionController for InternalController {
    fn current(&self) -> Option<&Venue> {
        self.selected.as_ref()
    }

    fn request(&mut self, next: Option<&Venue>) {
        self.selected = next.cloned();
    }

    fn reflect(&mut self, _selection: Option<Venue>) -> bool {
        trace!("Host selection ignored by uncontrolled coordinator");
        false
    }

    fn is_controlled(&self) -> bool {
        false
    }
}

/// Callback receiving selection requests in controlled mode.
pub type SelectionRequestFn = Box<dyn FnMut(Option<&Venue>) + Send>;

/// Controlled mode: the host owns the selection and the coordinator only
/// mirrors it.
pub struct ExternalController {
    selected: Option<Venue>,
    on_request: SelectionRequestFn,
}

impl ExternalController {
    pub fn new<F>(initial: Option<Venue>, on_request: F) -> Self
    where
        F: FnMut(Option<&Venue>) + Send + 'static,
    {
        Self {
            selected: initial,
            on_request: Box::new(on_request),
        }
    }
}

impl fmt::Debug for ExternalController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalController")
            .field("selected", &self.selected.as_ref().map(|v| &v.id))
            .finish_non_exhaustive()
    }
}

impl SelectionController for ExternalController {
    fn current(&self) -> Option<&Venue> {
        self.selected.as_ref()
    }

    fn request(&mut self, next: Option<&Venue>) {
        (self.on_request)(next);
    }

    fn reflect(&mut self, selection: Option<Venue>) -> bool {
        self.selected = selection;
        true
    }

    fn is_controlled(&self) -> bool {
        true
    }
}
