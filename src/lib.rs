//! renderprep - GPU render setup for job state files
//!
//! Library crate behind the `renderprep` binary. Loads a serialized job
//! state document, probes the machine for compute devices, selects the
//! best GPU backend, enforces the denoiser configuration the farm
//! expects, and writes the document back.

pub mod cli;
pub mod devices;
pub mod error;
pub mod job;
pub mod logic;
pub mod nodes;
pub mod setup;
pub mod types;

// Re-export main types for convenience
pub use devices::{ComputeDevice, DeviceProbe, FixtureProbe, SystemProbe, refresh_devices};
pub use error::{RenderPrepError, Result};
pub use job::{
    CyclesPreferences, CyclesSettings, JobState, Preferences, RenderSettings, Scene,
    SystemPreferences, TileSettings, ViewLayer,
};
pub use nodes::{CompositorNode, NodeKind, NodeTree};
pub use types::{
    CompositorDevice, ComputeBackend, DenoisePrefilter, DenoiseQuality, Denoiser, DeviceType,
    RenderEngine, SceneDevice,
};

// Decision logic
pub use logic::denoise::{apply_denoiser_config, denoising_requested};
pub use logic::select::{optix_available, select_gpu_rendering};

// Orchestration
pub use setup::{SetupOutcome, render_summary, render_transcript, run_setup};
