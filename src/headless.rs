//! Headless platform collaborators
//!
//! A console-backed implementation of the loading-gate collaborator
//! traits. UI and dialog calls are routed to the log, and enough state is
//! recorded for the binary to pick up a presented dialog and dismiss it.

use loadgate_core::{DialogHost, DialogRequest, Interface, Simulation};

/// Platform implementation that logs every collaborator call
pub struct HeadlessPlatform {
    mobile: bool,
    time_scale: f32,
    interface_visible: bool,
    indicator_visible: bool,
    open_dialog: Option<DialogRequest>,
}

impl HeadlessPlatform {
    /// Create a headless platform
    pub fn new(mobile: bool) -> Self {
        Self {
            mobile,
            time_scale: 1.0,
            interface_visible: true,
            indicator_visible: false,
            open_dialog: None,
        }
    }

    /// Current simulation time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Whether the normal interface is currently shown
    pub fn is_interface_visible(&self) -> bool {
        self.interface_visible
    }

    /// Whether the loading indicator is currently shown
    pub fn is_indicator_visible(&self) -> bool {
        self.indicator_visible
    }

    /// Take the currently presented dialog, if any
    ///
    /// The caller is expected to show it and then report dismissal to the
    /// orchestrator.
    pub fn take_open_dialog(&mut self) -> Option<DialogRequest> {
        self.open_dialog.take()
    }
}

impl Interface for HeadlessPlatform {
    fn set_interface_visible(&mut self, visible: bool) {
        self.interface_visible = visible;
        log::info!("interface {}", if visible { "shown" } else { "hidden" });
    }

    fn set_loading_indicator_visible(&mut self, visible: bool) {
        self.indicator_visible = visible;
        log::info!(
            "loading indicator {}",
            if visible { "shown" } else { "hidden" }
        );
    }
}

impl DialogHost for HeadlessPlatform {
    fn present(&mut self, request: DialogRequest) {
        log::info!("dialog presented: {}", request.title);
        self.open_dialog = Some(request);
    }
}

impl Simulation for HeadlessPlatform {
    fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
        log::info!("time scale set to {}", scale);
    }

    fn advance(&mut self, dt: f32, substeps: u32) {
        log::debug!("simulation advanced by {}s in {} substeps", dt, substeps);
    }

    fn is_mobile_platform(&self) -> bool {
        self.mobile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let platform = HeadlessPlatform::new(false);
        assert_eq!(platform.time_scale(), 1.0);
        assert!(platform.is_interface_visible());
        assert!(!platform.is_indicator_visible());
        assert!(!platform.is_mobile_platform());
    }

    #[test]
    fn test_records_collaborator_calls() {
        let mut platform = HeadlessPlatform::new(true);
        platform.set_time_scale(0.0);
        platform.set_interface_visible(false);
        platform.set_loading_indicator_visible(true);

        assert_eq!(platform.time_scale(), 0.0);
        assert!(!platform.is_interface_visible());
        assert!(platform.is_indicator_visible());
        assert!(platform.is_mobile_platform());
    }

    #[test]
    fn test_dialog_is_taken_once() {
        let mut platform = HeadlessPlatform::new(false);
        platform.present(DialogRequest {
            title: "Welcome".to_string(),
            content: "Ready to go.".to_string(),
            confirm_label: "Play".to_string(),
        });

        let dialog = platform.take_open_dialog().unwrap();
        assert_eq!(dialog.title, "Welcome");
        assert!(platform.take_open_dialog().is_none());
    }
}
