//! Type-safe render configuration types
//!
//! This module replaces the host application's stringly-typed identifiers
//! with proper Rust enums that provide compile-time validation and
//! exhaustive matching. Serialized forms are the canonical uppercase tokens
//! the host expects, so round-tripped job files stay loadable.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Render engine selected on the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum RenderEngine {
    #[default]
    #[strum(serialize = "CYCLES")]
    #[serde(rename = "CYCLES")]
    Cycles,
    #[strum(serialize = "BLENDER_EEVEE_NEXT")]
    #[serde(rename = "BLENDER_EEVEE_NEXT")]
    Eevee,
    #[strum(serialize = "BLENDER_WORKBENCH")]
    #[serde(rename = "BLENDER_WORKBENCH")]
    Workbench,
}

impl RenderEngine {
    /// Only Cycles jobs are eligible for GPU/denoiser setup
    pub fn is_cycles(&self) -> bool {
        matches!(self, Self::Cycles)
    }
}

/// Compute backend written to the preferences (`compute_device_type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ComputeBackend {
    #[default]
    None,
    Cuda,
    Optix,
    Hip,
}

/// Kind of an individual compute device in the preferences inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceType {
    #[default]
    Cpu,
    Cuda,
    Optix,
    Hip,
}

impl DeviceType {
    /// Check whether this device kind is a GPU backend
    pub fn is_gpu(&self) -> bool {
        !matches!(self, Self::Cpu)
    }
}

/// Render device selected on the scene (`cycles.device`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SceneDevice {
    #[default]
    Cpu,
    Gpu,
}

/// Denoiser implementation selected on the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum Denoiser {
    #[default]
    #[strum(serialize = "OPENIMAGEDENOISE")]
    #[serde(rename = "OPENIMAGEDENOISE")]
    OpenImageDenoise,
    #[strum(serialize = "OPTIX")]
    #[serde(rename = "OPTIX")]
    Optix,
}

/// Prefilter mode for the denoiser auxiliary passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum DenoisePrefilter {
    None,
    Fast,
    #[default]
    Accurate,
}

/// Denoiser quality setting (newer host versions only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum DenoiseQuality {
    #[default]
    High,
    Balanced,
    Fast,
}

/// Execution device for the compositor (`preferences.system.compositor_device`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CompositorDevice {
    #[default]
    Cpu,
    Gpu,
}
