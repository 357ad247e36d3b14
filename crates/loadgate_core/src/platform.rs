//! Collaborator contracts for the loading gate
//!
//! The orchestrator drives three narrow capabilities of the consuming
//! application: widget visibility, modal presentation, and simulation time
//! control. They are injected at construction rather than reached as
//! globals, so the orchestrator can be exercised against fakes.

/// Modal content shown when a scenario finishes loading
#[derive(Clone, Debug, PartialEq)]
pub struct DialogRequest {
    /// Modal title
    pub title: String,
    /// Descriptive body text
    pub content: String,
    /// Label of the single confirmation action
    pub confirm_label: String,
}

/// Widget visibility, owned by the host UI layer
///
/// Both operations are fire-and-forget and idempotent.
pub trait Interface {
    /// Show or hide the normal application interface
    fn set_interface_visible(&mut self, visible: bool);
    /// Show or hide the loading indicator
    fn set_loading_indicator_visible(&mut self, visible: bool);
}

/// Modal presentation, owned by the host dialog service
pub trait DialogHost {
    /// Show a modal with a single confirmation action.
    ///
    /// The host must report dismissal back through
    /// `LoadingOrchestrator::dialog_dismissed` exactly once.
    fn present(&mut self, request: DialogRequest);
}

/// Simulation time control, owned by the host world
pub trait Simulation {
    /// Set the simulation time scale (0 pauses, 1 is normal rate)
    fn set_time_scale(&mut self, scale: f32);
    /// Advance the simulation by `dt` seconds split into `substeps` steps
    fn advance(&mut self, dt: f32, substeps: u32);
    /// Whether the host runs on a mobile platform
    ///
    /// Mobile hosts keep the normal interface hidden after loading.
    fn is_mobile_platform(&self) -> bool;
}

/// The full capability set required by the orchestrator
pub trait Platform: Interface + DialogHost + Simulation {}

impl<T: Interface + DialogHost + Simulation> Platform for T {}
