//! Core loading orchestration for scene-based applications
//!
//! This crate provides the loading gate: the period during which a
//! consuming application pauses its simulation and shows a loading
//! indicator while external 3D-scene assets stream in.
//!
//! - [`TrackerEntry`] - Per-asset record of identifier, progress, and state
//! - [`LoadTicket`] - Handle to a tracked load
//! - [`LoadingOrchestrator`] - Owns the tracker, pumps source events, and
//!   fires the one-shot completion action
//! - [`AssetSource`] / [`FileSource`] - Retrieval backends
//! - [`AssetPayload`] - Decoding raw bytes into a typed asset
//! - [`Interface`] / [`DialogHost`] / [`Simulation`] - Injected host
//!   collaborators, combined by [`Platform`]
//! - [`ScenarioManifest`] - RON-serialized preload list and welcome text

mod asset_error;
mod manifest;
mod orchestrator;
mod platform;
mod source;
mod tracker;

pub use asset_error::AssetError;
pub use manifest::{AssetRef, ManifestLoadError, ManifestSaveError, ScenarioManifest};
pub use orchestrator::{LoadingOrchestrator, ScenarioIntro};
pub use platform::{DialogHost, DialogRequest, Interface, Platform, Simulation};
pub use source::{AssetPayload, AssetSource, FileSource, SourceEvent, DEFAULT_CHUNK_SIZE};
pub use tracker::{EntryState, LoadTicket, TrackerEntry};
