//! GPU backend selection
//!
//! Translates the refreshed device inventory into a concrete compute
//! backend choice, preferring OptiX over CUDA.
//!
//! # Design
//!
//! - **Pure logic**: operates on the job document only, never on the machine
//! - **One kind at a time**: after selection, at most one device kind is
//!   enabled, and it is the kind the selector returns
//! - **Fallback stays written**: when neither kind has a device, the CUDA
//!   backend remains configured with nothing enabled and the selector
//!   reports `None`; the orchestrator aborts before the job renders
//!
//! # Selection Rules
//!
//! | Inventory              | Backend | Enabled devices | Result      |
//! |------------------------|---------|-----------------|-------------|
//! | any OptiX device       | OPTIX   | all OptiX       | `Optix`     |
//! | CUDA devices, no OptiX | CUDA    | all CUDA        | `Cuda`      |
//! | neither kind           | CUDA    | none            | `None`      |

use crate::job::{CyclesPreferences, JobState};
use crate::types::{ComputeBackend, DeviceType, RenderEngine, SceneDevice};

/// Check whether any OptiX device is present in the inventory
pub fn optix_available(prefs: &CyclesPreferences) -> bool {
    prefs
        .devices
        .iter()
        .any(|d| d.device_type == DeviceType::Optix)
}

/// Enable GPU rendering, preferring OptiX with CUDA as fallback.
///
/// Forces the Cycles engine and the GPU render device on the scene, writes
/// the compute backend, and flips every device's enablement flag so that
/// only the selected kind stays enabled. Returns the selected kind, or
/// `None` when the inventory offers neither.
pub fn select_gpu_rendering(job: &mut JobState) -> Option<DeviceType> {
    // 1. The job renders with Cycles on the GPU from here on
    job.scene.render.engine = RenderEngine::Cycles;
    job.scene.cycles.device = SceneDevice::Gpu;

    let prefs = &mut job.preferences.cycles;
    if optix_available(prefs) {
        // 2. OptiX preferred: enable exactly the OptiX devices
        prefs.compute_device_type = ComputeBackend::Optix;
        for device in &mut prefs.devices {
            device.enabled = device.device_type == DeviceType::Optix;
        }
        log::info!("Selected OPTIX backend");
        Some(DeviceType::Optix)
    } else {
        // 3. CUDA fallback: the backend is written even when no CUDA
        //    device exists, with every device left disabled
        prefs.compute_device_type = ComputeBackend::Cuda;
        let mut found = false;
        for device in &mut prefs.devices {
            if device.device_type == DeviceType::Cuda {
                device.enabled = true;
                found = true;
            } else {
                device.enabled = false;
            }
        }
        if found {
            log::info!("Selected CUDA backend");
            Some(DeviceType::Cuda)
        } else {
            log::warn!("Inventory has neither OptiX nor CUDA devices, nothing enabled");
            None
        }
    }
}
