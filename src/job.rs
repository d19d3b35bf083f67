//! Job state document handling for loading and saving render job files.
//!
//! The document is the host application's scene, view layer and preferences
//! tree exported to JSON by the farm dispatcher. Mandatory fields exist in
//! every supported host version. Attributes that only exist on some host
//! versions are `Option` fields: they deserialize to `None` when absent,
//! are never invented by this tool, and are omitted again on save so a
//! round-tripped document stays loadable by the host that produced it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::devices::ComputeDevice;
use crate::error::{RenderPrepError, Result};
use crate::nodes::NodeTree;
use crate::types::{
    CompositorDevice, ComputeBackend, DenoisePrefilter, DenoiseQuality, Denoiser, RenderEngine,
    SceneDevice,
};

/// Manual tile configuration (hosts that expose tiling controls)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSettings {
    pub auto: bool,
    pub size: u32,
}

/// Scene render block (`scene.render`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub engine: RenderEngine,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_compositor_gpu: Option<bool>,
}

/// Scene-level Cycles settings (`scene.cycles`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CyclesSettings {
    pub device: SceneDevice,
    // The host reads this flag with a false default, so a missing field
    // means "off" rather than a malformed document
    #[serde(default)]
    pub use_denoising: bool,
    pub denoiser: Denoiser,
    pub denoising_store_passes: bool,
    pub denoising_prefilter: DenoisePrefilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denoising_quality: Option<DenoiseQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_denoising_gpu: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denoising_use_gpu: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiles: Option<TileSettings>,
}

/// The active scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    pub render: RenderSettings,
    pub cycles: CyclesSettings,
    #[serde(default)]
    pub use_nodes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_tree: Option<NodeTree>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            name: "Scene".to_string(),
            render: RenderSettings::default(),
            cycles: CyclesSettings::default(),
            use_nodes: false,
            node_tree: None,
        }
    }
}

/// Per-view-layer Cycles settings (`view_layer.cycles`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewLayerCycles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_denoising: Option<bool>,
}

/// The active view layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewLayer {
    pub name: String,
    #[serde(default)]
    pub cycles: ViewLayerCycles,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_pass_normal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_pass_diffuse_color: Option<bool>,
}

impl Default for ViewLayer {
    fn default() -> Self {
        Self {
            name: "ViewLayer".to_string(),
            cycles: ViewLayerCycles::default(),
            use_pass_normal: None,
            use_pass_diffuse_color: None,
        }
    }
}

/// Cycles add-on preferences (`preferences.addons['cycles'].preferences`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CyclesPreferences {
    #[serde(default)]
    pub compute_device_type: ComputeBackend,
    #[serde(default)]
    pub devices: Vec<ComputeDevice>,
}

/// System preferences (`preferences.system`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compositor_device: Option<CompositorDevice>,
}

/// User preferences snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub cycles: CyclesPreferences,
    #[serde(default)]
    pub system: SystemPreferences,
}

/// A render job state document that can be saved/loaded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobState {
    pub scene: Scene,
    pub view_layer: ViewLayer,
    #[serde(default)]
    pub preferences: Preferences,
}

impl JobState {
    /// Load a job state document from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            RenderPrepError::document(format!(
                "failed to read job file {:?}: {e}",
                path.as_ref()
            ))
        })?;

        let job: Self = serde_json::from_str(&content)?;
        Ok(job)
    }

    /// Save the job state document to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        fs::write(&path, json).map_err(|e| {
            RenderPrepError::document(format!(
                "failed to write job file {:?}: {e}",
                path.as_ref()
            ))
        })?;

        Ok(())
    }

    /// Validate the document
    ///
    /// Catches states no host export can produce. Version-dependent absences
    /// are not errors; the configurator skips those fields instead.
    pub fn validate(&self) -> Result<()> {
        if self.scene.name.trim().is_empty() {
            return Err(RenderPrepError::validation("Scene name must not be empty"));
        }

        if self.view_layer.name.trim().is_empty() {
            return Err(RenderPrepError::validation(
                "View layer name must not be empty",
            ));
        }

        for (i, device) in self.preferences.cycles.devices.iter().enumerate() {
            if device.name.trim().is_empty() {
                return Err(RenderPrepError::validation(format!(
                    "Device {i} has an empty name"
                )));
            }
        }

        if let Some(tiles) = &self.scene.cycles.tiles {
            if !(8..=4096).contains(&tiles.size) {
                return Err(RenderPrepError::validation(format!(
                    "Tile size {} is out of range (8-4096)",
                    tiles.size
                )));
            }
        }

        Ok(())
    }
}
