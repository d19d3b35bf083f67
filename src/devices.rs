//! Compute device enumeration
//!
//! Enumerates the compute devices of the machine the tool runs on using
//! pure Rust. No shelling out: detection reads the kernel's `/proc` and
//! `/sys` interfaces directly.
//!
//! # Design
//!
//! - **CPU always present**: software rendering needs no driver, so the
//!   inventory always starts with one CPU entry
//! - **NVIDIA via procfs**: one CUDA entry per GPU under
//!   `/proc/driver/nvidia/gpus/`, plus a matching OptiX entry when the
//!   driver version supports it
//! - **AMD via sysfs**: one HIP entry per DRM card with the AMD vendor id
//! - **Absence is not failure**: a missing driver interface means the
//!   machine has no such backend; only present-but-unreadable interfaces
//!   are errors
//!
//! # Integration
//!
//! The orchestrator refreshes the job document's inventory through a
//! `DeviceProbe` before backend selection. Tests and offline dispatch
//! tooling substitute `FixtureProbe`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{RenderPrepError, Result};
use crate::job::CyclesPreferences;
use crate::types::DeviceType;

const NVIDIA_PROC_DIR: &str = "/proc/driver/nvidia";
const DRM_SYSFS_DIR: &str = "/sys/class/drm";
const AMD_VENDOR_ID: &str = "0x1002";

/// Oldest NVIDIA driver series with OptiX support for current render kernels
const OPTIX_MIN_DRIVER_MAJOR: u32 = 470;

/// One compute device in the preferences inventory.
///
/// Serialized field names follow the host attributes, which are the Rust
/// keywords `type` and `use`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeDevice {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[serde(rename = "use", default)]
    pub enabled: bool,
}

impl ComputeDevice {
    /// Create a disabled device entry
    pub fn new(name: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            name: name.into(),
            device_type,
            enabled: false,
        }
    }
}

impl fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.device_type)
    }
}

/// Source of the machine's device inventory
pub trait DeviceProbe {
    /// Enumerate every compute device present on this machine
    fn enumerate(&self) -> Result<Vec<ComputeDevice>>;
}

/// Live probe reading the kernel driver interfaces of this machine
pub struct SystemProbe;

impl DeviceProbe for SystemProbe {
    fn enumerate(&self) -> Result<Vec<ComputeDevice>> {
        let mut devices = vec![ComputeDevice::new(detect_cpu_name(), DeviceType::Cpu)];
        devices.extend(detect_nvidia_devices(Path::new(NVIDIA_PROC_DIR))?);
        devices.extend(detect_amd_devices(Path::new(DRM_SYSFS_DIR))?);

        log::info!("Device probe found {} device(s)", devices.len());
        for device in &devices {
            log::debug!("  {device}");
        }

        Ok(devices)
    }
}

/// Fixed inventory for tests and pre-baked farm dispatch
pub struct FixtureProbe {
    devices: Vec<ComputeDevice>,
}

impl FixtureProbe {
    pub fn new(devices: Vec<ComputeDevice>) -> Self {
        Self { devices }
    }
}

impl DeviceProbe for FixtureProbe {
    fn enumerate(&self) -> Result<Vec<ComputeDevice>> {
        Ok(self.devices.clone())
    }
}

/// Replace the document's inventory with a freshly probed device list.
///
/// Enablement flags of devices that reappear are preserved, matching the
/// host's own refresh behavior. Identical twin devices are matched in
/// listing order.
pub fn refresh_devices(prefs: &mut CyclesPreferences, probe: &dyn DeviceProbe) -> Result<()> {
    let fresh = probe.enumerate()?;

    let mut consumed = vec![false; prefs.devices.len()];
    let devices = fresh
        .into_iter()
        .map(|mut device| {
            let previous = prefs.devices.iter().enumerate().find_map(|(i, old)| {
                (!consumed[i]
                    && old.name == device.name
                    && old.device_type == device.device_type)
                    .then_some(i)
            });
            if let Some(i) = previous {
                consumed[i] = true;
                device.enabled = prefs.devices[i].enabled;
            }
            device
        })
        .collect();

    prefs.devices = devices;
    log::info!(
        "Refreshed device inventory: {} device(s)",
        prefs.devices.len()
    );
    Ok(())
}

// ============================================================================
// Detection Functions
// ============================================================================

/// Read the CPU model name for the inventory's CPU entry.
///
/// An unreadable `/proc/cpuinfo` degrades to a generic name; CPU rendering
/// is available either way.
fn detect_cpu_name() -> String {
    match fs::read_to_string("/proc/cpuinfo") {
        Ok(content) => parse_cpu_model(&content).unwrap_or_else(|| "CPU".to_string()),
        Err(e) => {
            log::warn!("Could not read /proc/cpuinfo: {e}");
            "CPU".to_string()
        }
    }
}

fn parse_cpu_model(cpuinfo: &str) -> Option<String> {
    cpuinfo.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == "model name").then(|| value.trim().to_string())
    })
}

/// Enumerate NVIDIA GPUs through the proprietary driver's procfs interface.
///
/// Each GPU yields a CUDA entry. When the driver series is recent enough
/// for OptiX, each GPU yields a matching OptiX entry as well, the same way
/// the host lists one device per usable backend.
fn detect_nvidia_devices(proc_dir: &Path) -> Result<Vec<ComputeDevice>> {
    if !proc_dir.exists() {
        log::debug!("{} not present, no NVIDIA driver loaded", proc_dir.display());
        return Ok(Vec::new());
    }

    let version_path = proc_dir.join("version");
    let driver_major = match fs::read_to_string(&version_path) {
        Ok(text) => {
            let major = parse_driver_major(&text);
            if major.is_none() {
                log::warn!("Could not parse NVIDIA driver version, assuming no OptiX support");
            }
            major
        }
        // Stripped driver builds ship no version file; their GPUs still
        // render over CUDA
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!(
                "{} not present, assuming no OptiX support",
                version_path.display()
            );
            None
        }
        Err(e) => {
            return Err(RenderPrepError::probe(format!(
                "failed to read {}: {e}",
                version_path.display()
            )));
        }
    };
    let optix_capable = driver_major.is_some_and(|major| major >= OPTIX_MIN_DRIVER_MAJOR);
    if let Some(major) = driver_major {
        log::info!("NVIDIA driver series {major} detected (OptiX capable: {optix_capable})");
    }

    let gpus_dir = proc_dir.join("gpus");
    if !gpus_dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries: Vec<_> = fs::read_dir(&gpus_dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    let mut devices = Vec::new();
    for entry in entries {
        let info_path = entry.path().join("information");
        let name = match fs::read_to_string(&info_path) {
            Ok(text) => parse_gpu_model(&text).unwrap_or_else(|| "NVIDIA GPU".to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("{} not present, using a generic name", info_path.display());
                "NVIDIA GPU".to_string()
            }
            Err(e) => {
                return Err(RenderPrepError::probe(format!(
                    "failed to read {}: {e}",
                    info_path.display()
                )));
            }
        };
        devices.push(ComputeDevice::new(name.clone(), DeviceType::Cuda));
        if optix_capable {
            devices.push(ComputeDevice::new(name, DeviceType::Optix));
        }
    }
    Ok(devices)
}

fn parse_driver_major(version_text: &str) -> Option<u32> {
    let line = version_text
        .lines()
        .find(|line| line.contains("NVRM version:"))?;
    // First dotted numeric token on the NVRM line is the driver version
    line.split_whitespace().find_map(|token| {
        let (major, rest) = token.split_once('.')?;
        if rest.chars().next()?.is_ascii_digit() {
            major.parse().ok()
        } else {
            None
        }
    })
}

fn parse_gpu_model(information: &str) -> Option<String> {
    information.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == "Model").then(|| value.trim().to_string())
    })
}

/// Enumerate AMD GPUs through the DRM sysfs class.
///
/// Connector entries (`card0-DP-1`) and render nodes are skipped; only the
/// primary card nodes are checked for the AMD PCI vendor id.
fn detect_amd_devices(drm_dir: &Path) -> Result<Vec<ComputeDevice>> {
    if !drm_dir.exists() {
        log::debug!("{} not present, no DRM subsystem", drm_dir.display());
        return Ok(Vec::new());
    }

    let mut entries: Vec<_> = fs::read_dir(drm_dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    let mut devices = Vec::new();
    for entry in entries {
        let file_name = entry.file_name();
        let Some(card) = file_name.to_str() else {
            continue;
        };
        let Some(index) = card.strip_prefix("card") else {
            continue;
        };
        if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let vendor_path = entry.path().join("device/vendor");
        let vendor = match fs::read_to_string(&vendor_path) {
            Ok(text) => text,
            // Virtual or headless cards have no PCI device node
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(RenderPrepError::probe(format!(
                    "failed to read {}: {e}",
                    vendor_path.display()
                )));
            }
        };
        if vendor.trim() == AMD_VENDOR_ID {
            devices.push(ComputeDevice::new(
                format!("AMD GPU ({card})"),
                DeviceType::Hip,
            ));
        }
    }
    Ok(devices)
}

// ============================================================================
// Tests
// ============================================================================
