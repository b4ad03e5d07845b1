//! Single-selection state shared by the map, the details panel and the
//! bottom-sheet list.
//!
//! # State Machine
//!
//! ```text
//! Idle          --tap(v)-------------------->  Selected(v)   (panel opens)
//! Selected(v1)  --tap(v1)------------------->  Selected(v1)  (no-op)
//! Selected(v1)  --tap(v2)------------------->  Selected(v2)  (panel stays open)
//! Selected(*)   --background / close tap---->  Idle          (panel closes)
//! ```
//!
//! Who owns the selected value is decided once, at construction, by the
//! [`SelectionController`] injected into the [`SelectionCoordinator`]:
//!
//! - [`InternalController`] keeps the selection itself (uncontrolled).
//! - [`ExternalController`] forwards every request to the host and only
//!   reflects what the host pushes back (controlled).

mod controller;
mod coordinator;
mod panel;

pub use controller::{
    ExternalController, InternalController, SelectionController, SelectionRequestFn,
};
pub use coordinator::{SelectionChange, SelectionCoordinator, SelectionEvent};
pub use panel::{DetailsPanel, PanelAnimator, PanelCommand, PanelPhase, QueuedAnimator};
