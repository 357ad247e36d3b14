//! Load orchestration and the loading gate
//!
//! The [`LoadingOrchestrator`] owns a growing collection of tracker
//! entries, delegates retrieval to an [`AssetSource`], and holds the
//! consuming application in a "loading" state until every tracked load has
//! finished. Construction closes the gate (simulation paused, interface
//! hidden, loading indicator shown); the first moment all entries are
//! finished, a one-shot completion action runs and the indicator is
//! hidden.

use crate::asset_error::AssetError;
use crate::platform::{DialogRequest, Platform};
use crate::source::{AssetSource, SourceEvent};
use crate::tracker::{EntryState, LoadTicket, TrackerEntry};

/// Confirm label of the welcome modal
const WELCOME_CONFIRM_LABEL: &str = "Play";

/// Scenario blurb shown on the welcome screen
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioIntro {
    /// Modal title
    pub title: String,
    /// Descriptive body text
    pub content: String,
}

/// One-shot guard for the completion action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CompletionSignal {
    Pending,
    Fired,
}

/// The registered completion action
enum CompletionAction<P: 'static> {
    /// Caller-provided one-shot action
    Custom(Box<dyn FnOnce(&mut P)>),
    /// Resume one step at normal rate, then present the scenario modal
    Welcome(ScenarioIntro),
}

/// Coordinates concurrent asset loads behind a loading gate
///
/// The orchestrator is single-threaded and event-driven: all suspension
/// happens inside the source, and state only changes when the caller's
/// loop invokes [`pump`](LoadingOrchestrator::pump). Entries are appended
/// only and never removed.
pub struct LoadingOrchestrator<S: AssetSource, P: Platform + 'static> {
    /// Retrieval backend
    source: S,
    /// Host collaborators (UI, dialogs, simulation)
    platform: P,
    /// Insertion-ordered, append-only tracker entries
    entries: Vec<TrackerEntry>,
    /// Per-entry asset handoff, consumed on success
    deliveries: Vec<Option<Box<dyn FnOnce(S::Asset)>>>,
    /// Registered completion action, consumed when fired
    action: Option<CompletionAction<P>>,
    /// Guard ensuring the completion action runs at most once
    signal: CompletionSignal,
    /// Whether the welcome modal is awaiting dismissal
    dialog_open: bool,
    /// True until the first loading session has completed.
    ///
    /// Maintained by the caller; the orchestrator never mutates it.
    pub first_load: bool,
}

impl<S: AssetSource, P: Platform + 'static> LoadingOrchestrator<S, P> {
    /// Create an orchestrator and close the loading gate
    ///
    /// Pauses simulation time, hides the normal interface, and shows the
    /// loading indicator. The gate stays closed until every tracked load
    /// finishes.
    pub fn new(source: S, mut platform: P) -> Self {
        platform.set_time_scale(0.0);
        platform.set_interface_visible(false);
        platform.set_loading_indicator_visible(true);

        Self {
            source,
            platform,
            entries: Vec::new(),
            deliveries: Vec::new(),
            action: None,
            signal: CompletionSignal::Pending,
            dialog_open: false,
            first_load: true,
        }
    }

    // --- Load registration ---

    /// Register a new tracked load and begin retrieval
    ///
    /// Every call appends exactly one entry; loads are never merged or
    /// deduplicated by path, even when the same path is requested twice.
    /// `on_loaded` receives the decoded payload once retrieval succeeds.
    pub fn begin_load(
        &mut self,
        path: &str,
        on_loaded: impl FnOnce(S::Asset) + 'static,
    ) -> LoadTicket {
        debug_assert!(!path.is_empty(), "asset path must not be empty");

        let ticket = LoadTicket(self.entries.len());
        self.entries.push(TrackerEntry::new(path));
        self.deliveries.push(Some(Box::new(on_loaded)));
        self.source.request(ticket, path);
        ticket
    }

    // --- Event handling ---

    /// Drain and dispatch all pending source events
    ///
    /// Call this from the application's update loop. Returns the number of
    /// events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.source.poll() {
            handled += 1;
            match event {
                SourceEvent::Progress {
                    ticket,
                    loaded,
                    total,
                } => self.record_progress(ticket, loaded, total),
                SourceEvent::Loaded { ticket, asset } => {
                    if let Some(slot) = self.deliveries.get_mut(ticket.index()) {
                        if let Some(deliver) = slot.take() {
                            deliver(asset);
                        }
                    }
                    self.mark_done(ticket);
                }
                SourceEvent::Failed { ticket, error } => self.record_failure(ticket, &error),
            }
        }
        handled
    }

    /// Update an entry's fractional progress
    ///
    /// Only applied while the entry is pending and the total size is
    /// known; terminal entries never move again.
    fn record_progress(&mut self, ticket: LoadTicket, loaded: u64, total: Option<u64>) {
        let entry = match self.entries.get_mut(ticket.index()) {
            Some(entry) => entry,
            None => {
                log::warn!("progress event for unknown load {:?}", ticket);
                return;
            }
        };

        if entry.state != EntryState::Pending {
            return;
        }
        if let Some(total) = total.filter(|t| *t > 0) {
            entry.progress = (loaded as f32 / total as f32).clamp(0.0, 1.0);
        }
    }

    /// Record a terminal failure for an entry
    ///
    /// The failure is reported to the log and the entry moves to `Failed`.
    /// A failed entry never counts as finished, so one failing asset keeps
    /// the gate closed; callers can inspect [`failed_paths`](Self::failed_paths).
    fn record_failure(&mut self, ticket: LoadTicket, error: &AssetError) {
        let entry = match self.entries.get_mut(ticket.index()) {
            Some(entry) => entry,
            None => {
                log::warn!("failure event for unknown load {:?}", ticket);
                return;
            }
        };

        log::error!("failed to load '{}': {}", entry.path, error);
        entry.state = EntryState::Failed;
    }

    /// Mark a tracked load as successfully finished
    ///
    /// Sets the entry to `Finished` at progress 1.0 even if progress
    /// events under- or over-reported, then re-evaluates global
    /// completion. Normally driven by [`pump`](Self::pump); redundant
    /// calls are safe and never re-fire the completion action.
    pub fn mark_done(&mut self, ticket: LoadTicket) {
        let entry = match self.entries.get_mut(ticket.index()) {
            Some(entry) => entry,
            None => {
                log::warn!("mark_done for unknown load {:?}", ticket);
                return;
            }
        };

        entry.state = EntryState::Finished;
        entry.progress = 1.0;
        self.try_finish();
    }

    /// Fire the completion action if all entries just became finished
    fn try_finish(&mut self) {
        if self.signal == CompletionSignal::Fired || !self.is_loading_done() {
            return;
        }
        self.signal = CompletionSignal::Fired;

        match self.action.take() {
            Some(CompletionAction::Custom(callback)) => callback(&mut self.platform),
            Some(CompletionAction::Welcome(intro)) => {
                // One normal-rate step so the modal opens over a settled scene
                self.platform.advance(1.0, 1);
                self.platform.present(DialogRequest {
                    title: intro.title,
                    content: intro.content,
                    confirm_label: WELCOME_CONFIRM_LABEL.to_string(),
                });
                self.dialog_open = true;
            }
            None => {
                let visible = !self.platform.is_mobile_platform();
                self.platform.set_interface_visible(visible);
            }
        }

        self.platform.set_loading_indicator_visible(false);
        log::info!("all {} tracked loads finished", self.entries.len());
    }

    // --- Completion registration ---

    /// Install a caller-provided one-shot completion action
    ///
    /// The first registration (of either kind) wins; later calls are
    /// silently ignored.
    pub fn set_completion_callback(&mut self, callback: impl FnOnce(&mut P) + 'static) {
        if self.action.is_some() {
            return;
        }
        self.action = Some(CompletionAction::Custom(Box::new(callback)));
    }

    /// Install the welcome-screen completion action for a scenario
    ///
    /// When loading completes, the simulation advances one logical step at
    /// normal rate and the scenario modal is presented. The first
    /// registration (of either kind) wins; later calls are silently
    /// ignored, so a deferred first-scenario welcome is never overwritten
    /// by subsequent loads.
    pub fn register_welcome_screen(&mut self, intro: ScenarioIntro) {
        if self.action.is_some() {
            return;
        }
        self.action = Some(CompletionAction::Welcome(intro));
    }

    /// Host notification that the welcome modal was dismissed
    ///
    /// Restores the simulation time scale to normal and sets interface
    /// visibility by the mobile rule. Effective exactly once per presented
    /// dialog; a call with no open dialog is a no-op.
    pub fn dialog_dismissed(&mut self) {
        if !self.dialog_open {
            return;
        }
        self.dialog_open = false;

        self.platform.set_time_scale(1.0);
        let visible = !self.platform.is_mobile_platform();
        self.platform.set_interface_visible(visible);
    }

    // --- Queries ---

    /// Aggregate progress in percent: mean of all entries' progress
    ///
    /// Display only; completion is decided solely by the finished flags.
    /// An empty tracker reports 100.0, consistent with the vacuous
    /// completion rule.
    pub fn loading_percentage(&self) -> f32 {
        if self.entries.is_empty() {
            return 100.0;
        }
        let sum: f32 = self.entries.iter().map(|e| e.progress).sum();
        sum / self.entries.len() as f32 * 100.0
    }

    /// True iff every tracked load is finished (vacuously true when empty)
    pub fn is_loading_done(&self) -> bool {
        self.entries.iter().all(|e| e.state == EntryState::Finished)
    }

    /// Whether any tracked load has failed terminally
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|e| e.state == EntryState::Failed)
    }

    /// Paths of all failed loads, in registration order
    pub fn failed_paths(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.state == EntryState::Failed)
            .map(|e| e.path())
            .collect()
    }

    /// All tracker entries, in registration order
    pub fn entries(&self) -> &[TrackerEntry] {
        &self.entries
    }

    /// Look up a single entry by ticket
    pub fn entry(&self, ticket: LoadTicket) -> Option<&TrackerEntry> {
        self.entries.get(ticket.index())
    }

    /// Shared access to the injected platform
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable access to the injected platform
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}
