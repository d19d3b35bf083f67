//! Setup orchestration
//!
//! Sequences inventory refresh, backend selection, and denoiser
//! enforcement over a loaded job document, with early-exit guards.
//!
//! # Design
//!
//! - **Typed outcome**: every early exit is a [`SetupOutcome`] variant,
//!   and every outcome is a success; only I/O and probe failures are errors
//! - **Single refresh**: the inventory is probed once per run, before
//!   backend selection
//! - **Reproducible transcript**: the user-facing output is rendered from
//!   the outcome plus the final document state, so tests can assert it

use crate::devices::{self, DeviceProbe};
use crate::error::Result;
use crate::job::JobState;
use crate::logic::{denoise, select};
use crate::types::{DeviceType, RenderEngine};

/// Tile edge length pinned on hosts that expose manual tiling
const GPU_TILE_SIZE: u32 = 256;

/// Outcome of a setup run. Every variant is a success; early exits are
/// skipped work, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The scene does not render with Cycles; the document was not touched
    EngineMismatch { engine: RenderEngine },
    /// Neither OptiX nor CUDA devices exist; no device was enabled
    NoDevices,
    /// GPU configured; denoising is not requested anywhere in the file
    GpuOnly { gpu: DeviceType },
    /// GPU configured and the denoiser forced to OpenImageDenoise
    Configured { gpu: DeviceType },
}

/// Configure GPU rendering and enforce OpenImageDenoise if the file asks
/// for denoising.
///
/// A straight-line decision tree with four exit points. The probe supplies
/// the machine's device inventory; pass a [`devices::FixtureProbe`] to run
/// against a pre-baked inventory instead of the live machine.
pub fn run_setup(job: &mut JobState, probe: &dyn DeviceProbe) -> Result<SetupOutcome> {
    // 1. Only Cycles jobs get GPU and denoiser setup
    if !job.scene.render.engine.is_cycles() {
        log::info!(
            "Engine is {}, leaving the job untouched",
            job.scene.render.engine
        );
        return Ok(SetupOutcome::EngineMismatch {
            engine: job.scene.render.engine,
        });
    }

    // 2. Refresh the inventory, then pick a backend
    devices::refresh_devices(&mut job.preferences.cycles, probe)?;
    let Some(gpu) = select::select_gpu_rendering(job) else {
        return Ok(SetupOutcome::NoDevices);
    };

    // 3. Denoiser enforcement only when the file requests denoising
    if !denoise::denoising_requested(job) {
        return Ok(SetupOutcome::GpuOnly { gpu });
    }

    // 4. Force the denoiser, and pin tiles where the host has them
    denoise::apply_denoiser_config(job);
    if let Some(tiles) = job.scene.cycles.tiles.as_mut() {
        tiles.auto = false;
        tiles.size = GPU_TILE_SIZE;
    }

    Ok(SetupOutcome::Configured { gpu })
}

/// Render the final configuration block shown after a full setup
pub fn render_summary(job: &JobState) -> String {
    let prefs = &job.preferences.cycles;
    let mut out = String::new();
    out.push_str("=== Final Configuration ===\n");
    out.push_str(&format!("Compute Type: {}\n", prefs.compute_device_type));
    out.push_str(&format!("Render Device: {}\n", job.scene.cycles.device));
    out.push_str(&format!("Denoiser: {} (GPU)\n", job.scene.cycles.denoiser));
    out.push_str("Enabled Devices:\n");
    for device in prefs.devices.iter().filter(|d| d.enabled) {
        out.push_str(&format!("  - {device}\n"));
    }
    out
}

/// Render the user-facing transcript for a finished run.
///
/// Every line the tool prints on stdout for the given outcome, including
/// the summary block on the fully configured path.
pub fn render_transcript(outcome: &SetupOutcome, job: &JobState) -> String {
    let mut out = String::new();
    match outcome {
        SetupOutcome::EngineMismatch { .. } => {
            out.push_str("Cycles not active, skipping setup.\n");
        }
        SetupOutcome::NoDevices => {
            out.push_str("Configuring GPU rendering...\n");
            out.push_str("No GPU devices found, aborting.\n");
        }
        SetupOutcome::GpuOnly { gpu } => {
            out.push_str("Configuring GPU rendering...\n");
            out.push_str(&format!("GPU setup complete: {gpu}\n"));
            out.push_str("Denoising not enabled in file; skipping denoiser setup.\n");
        }
        SetupOutcome::Configured { gpu } => {
            out.push_str("Configuring GPU rendering...\n");
            out.push_str(&format!("GPU setup complete: {gpu}\n"));
            out.push_str("Denoising enabled: forcing OIDN configuration...\n");
            out.push_str(&render_summary(job));
        }
    }
    out
}
