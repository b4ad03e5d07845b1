//! Details panel reveal/dismiss lifecycle.
//!
//! The panel content stays mounted until the closing animation reports
//! completion, so it never disappears before the animation finishes.

use tracing::trace;

use crate::model::Venue;

/// Drives the panel's composed translate + fade animation.
pub trait PanelAnimator: Send {
    /// Start revealing the panel.
    fn animate_open(&mut self);
    /// Start dismissing the panel.
    fn animate_close(&mut self);
}

/// Panel animation commands, as recorded by [`QueuedAnimator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    Open,
    Close,
}

/// Animator that queues commands for a host to drain.
#[derive(Debug, Default)]
pub struct QueuedAnimator {
    queue: Vec<PanelCommand>,
}

impl QueuedAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> Vec<PanelCommand> {
        std::mem::take(&mut self.queue)
    }

    pub fn pending(&self) -> &[PanelCommand] {
        &self.queue
    }
}

impl PanelAnimator for QueuedAnimator {
    fn animate_open(&mut self) {
        self.queue.push(PanelCommand::Open);
    }

    fn animate_close(&mut self) {
        self.queue.push(PanelCommand::Close);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Hidden,
    Opening,
    Open,
    Closing,
}

/// Details panel state: animation phase plus the mounted content.
#[derive(Debug)]
pub struct DetailsPanel<A> {
    animator: A,
    phase: PanelPhase,
    content: Option<Venue>,
}

impl<A: PanelAnimator> DetailsPanel<A> {
    pub fn new(animator: A) -> Self {
        Self {
            animator,
            phase: PanelPhase::Hidden,
            content: None,
        }
    }

    /// Shows `venue`. Starts the open animation only from a closed or
    /// closing panel; an open panel just swaps its content.
    pub fn show(&mut self, venue: Venue) {
        match self.phase {
            PanelPhase::Hidden | PanelPhase::Closing => {
                self.phase = PanelPhase::Opening;
                self.animator.animate_open();
                trace!(venue_id = %venue.id, "Details panel opening");
            }
            PanelPhase::Opening | PanelPhase::Open => {
                trace!(venue_id = %venue.id, "Details panel content replaced");
            }
        }
        self.content = Some(venue);
    }

    /// Starts dismissing. Content stays mounted until [`Self::close_finished`].
    pub fn hide(&mut self) {
        if matches!(self.phase, PanelPhase::Opening | PanelPhase::Open) {
            self.phase = PanelPhase::Closing;
            self.animator.animate_close();
            trace!("Details panel closing");
        }
    }

    pub fn open_finished(&mut self) {
        if self.phase == PanelPhase::Opening {
            self.phase = PanelPhase::Open;
        }
    }

    /// Unmounts the content, unless the panel was reopened meanwhile.
    pub fn close_finished(&mut self) {
        if self.phase == PanelPhase::Closing {
            self.phase = PanelPhase::Hidden;
            self.content = None;
            trace!("Details panel hidden");
        }
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    /// Venue currently mounted in the panel.
    pub fn content(&self) -> Option<&Venue> {
        self.content.as_ref()
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }
}
