//! Denoising detection and OpenImageDenoise enforcement
//!
//! # Design
//!
//! - **Detector**: pure predicate over three sources, OR-combined in
//!   written order with short-circuit, no writes
//! - **Configurator**: unconditional writer; attributes only some host
//!   versions expose are overwritten when present and left absent
//!   otherwise, so older documents configure without error
//!
//! # Detection Sources
//!
//! | Source      | Field                                              |
//! |-------------|----------------------------------------------------|
//! | Scene       | `scene.cycles.use_denoising`                       |
//! | View layer  | `view_layer.cycles.use_denoising` (when present)   |
//! | Compositor  | a DENOISE node, when nodes are on and a tree exists |

use crate::job::JobState;
use crate::types::{CompositorDevice, DenoisePrefilter, DenoiseQuality, Denoiser};

/// Return true if any denoising is enabled in scene, view layer, or compositor
pub fn denoising_requested(job: &JobState) -> bool {
    // 1. Scene-level flag
    if job.scene.cycles.use_denoising {
        return true;
    }

    // 2. View-layer flag, on hosts that expose it
    if job.view_layer.cycles.use_denoising == Some(true) {
        return true;
    }

    // 3. Compositor graph with a DENOISE node
    if job.scene.use_nodes {
        if let Some(tree) = &job.scene.node_tree {
            return tree.has_denoise_node();
        }
    }

    false
}

// Overwrite only when the document carries the attribute
fn set_if_present<T>(slot: &mut Option<T>, value: T) {
    if slot.is_some() {
        *slot = Some(value);
    }
}

/// Force OpenImageDenoise for scene, view layer, and compositor with GPU
/// execution and high quality.
///
/// Mandatory settings are overwritten unconditionally; version-dependent
/// attributes go through [`set_if_present`] guards. Never fails.
pub fn apply_denoiser_config(job: &mut JobState) {
    // 1. Scene-level denoising
    job.scene.cycles.use_denoising = true;
    job.scene.cycles.denoiser = Denoiser::OpenImageDenoise;
    job.scene.cycles.denoising_store_passes = true;
    job.scene.cycles.denoising_prefilter = DenoisePrefilter::Accurate;
    set_if_present(
        &mut job.scene.cycles.denoising_quality,
        DenoiseQuality::High,
    );

    // 2. Auxiliary normal and albedo passes
    set_if_present(&mut job.view_layer.use_pass_normal, true);
    set_if_present(&mut job.view_layer.use_pass_diffuse_color, true);

    // 3. GPU denoising flags
    set_if_present(&mut job.scene.cycles.use_denoising_gpu, true);
    set_if_present(&mut job.scene.cycles.denoising_use_gpu, true);

    // 4. Compositor execution device
    set_if_present(&mut job.scene.render.use_compositor_gpu, true);
    set_if_present(
        &mut job.preferences.system.compositor_device,
        CompositorDevice::Gpu,
    );

    // 5. DENOISE nodes in the compositor graph
    if job.scene.use_nodes {
        if let Some(tree) = job.scene.node_tree.as_mut() {
            for node in tree.denoise_nodes_mut() {
                set_if_present(&mut node.use_gpu, true);
                set_if_present(&mut node.use_hdr, true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{CompositorNode, NodeKind, NodeTree};

    fn tree_with_denoise() -> NodeTree {
        NodeTree {
            nodes: vec![
                CompositorNode::new("Render Layers", NodeKind::RenderLayers),
                CompositorNode::new("Denoise", NodeKind::Denoise),
                CompositorNode::new("Composite", NodeKind::Composite),
            ],
        }
    }

    // ========================================================================
    // Detector
    // ========================================================================

    #[test]
    fn test_detects_scene_flag() {
        let mut job = JobState::default();
        job.scene.cycles.use_denoising = true;
        assert!(denoising_requested(&job));
    }

    #[test]
    fn test_detects_view_layer_flag() {
        let mut job = JobState::default();
        job.view_layer.cycles.use_denoising = Some(true);
        assert!(denoising_requested(&job));
    }

    #[test]
    fn test_view_layer_flag_false_or_absent() {
        let mut job = JobState::default();
        job.view_layer.cycles.use_denoising = Some(false);
        assert!(!denoising_requested(&job));

        job.view_layer.cycles.use_denoising = None;
        assert!(!denoising_requested(&job));
    }

    #[test]
    fn test_detects_denoise_node() {
        let mut job = JobState::default();
        job.scene.use_nodes = true;
        job.scene.node_tree = Some(tree_with_denoise());
        assert!(denoising_requested(&job));
    }

    #[test]
    fn test_tree_without_denoise_node() {
        let mut job = JobState::default();
        job.scene.use_nodes = true;
        job.scene.node_tree = Some(NodeTree {
            nodes: vec![CompositorNode::new("Composite", NodeKind::Composite)],
        });
        assert!(!denoising_requested(&job));
    }

    #[test]
    fn test_nodes_disabled_ignores_tree() {
        // A denoise node in the graph counts only while nodes are enabled
        let mut job = JobState::default();
        job.scene.use_nodes = false;
        job.scene.node_tree = Some(tree_with_denoise());
        assert!(!denoising_requested(&job));
    }

    #[test]
    fn test_use_nodes_without_tree() {
        let mut job = JobState::default();
        job.scene.use_nodes = true;
        job.scene.node_tree = None;
        assert!(!denoising_requested(&job));
    }

    #[test]
    fn test_all_sources_off() {
        assert!(!denoising_requested(&JobState::default()));
    }

    #[test]
    fn test_detector_has_no_side_effects() {
        let mut job = JobState::default();
        job.scene.use_nodes = true;
        job.scene.node_tree = Some(tree_with_denoise());
        job.view_layer.cycles.use_denoising = Some(false);

        let snapshot = job.clone();
        denoising_requested(&job);
        assert_eq!(job, snapshot);
    }

    // ========================================================================
    // Configurator
    // ========================================================================

    #[test]
    fn test_mandatory_writes() {
        let mut job = JobState::default();
        job.scene.cycles.denoiser = Denoiser::Optix;
        job.scene.cycles.denoising_prefilter = DenoisePrefilter::Fast;

        apply_denoiser_config(&mut job);

        assert!(job.scene.cycles.use_denoising);
        assert_eq!(job.scene.cycles.denoiser, Denoiser::OpenImageDenoise);
        assert!(job.scene.cycles.denoising_store_passes);
        assert_eq!(
            job.scene.cycles.denoising_prefilter,
            DenoisePrefilter::Accurate
        );
    }

    #[test]
    fn test_absent_attributes_stay_absent() {
        let mut job = JobState::default();

        apply_denoiser_config(&mut job);

        assert_eq!(job.scene.cycles.denoising_quality, None);
        assert_eq!(job.scene.cycles.use_denoising_gpu, None);
        assert_eq!(job.scene.cycles.denoising_use_gpu, None);
        assert_eq!(job.scene.render.use_compositor_gpu, None);
        assert_eq!(job.preferences.system.compositor_device, None);
        assert_eq!(job.view_layer.use_pass_normal, None);
        assert_eq!(job.view_layer.use_pass_diffuse_color, None);
    }

    #[test]
    fn test_present_attributes_overwritten() {
        let mut job = JobState::default();
        job.scene.cycles.denoising_quality = Some(DenoiseQuality::Fast);
        job.scene.cycles.use_denoising_gpu = Some(false);
        job.scene.cycles.denoising_use_gpu = Some(false);
        job.scene.render.use_compositor_gpu = Some(false);
        job.preferences.system.compositor_device = Some(CompositorDevice::Cpu);
        job.view_layer.use_pass_normal = Some(false);
        job.view_layer.use_pass_diffuse_color = Some(false);

        apply_denoiser_config(&mut job);

        assert_eq!(
            job.scene.cycles.denoising_quality,
            Some(DenoiseQuality::High)
        );
        assert_eq!(job.scene.cycles.use_denoising_gpu, Some(true));
        assert_eq!(job.scene.cycles.denoising_use_gpu, Some(true));
        assert_eq!(job.scene.render.use_compositor_gpu, Some(true));
        assert_eq!(
            job.preferences.system.compositor_device,
            Some(CompositorDevice::Gpu)
        );
        assert_eq!(job.view_layer.use_pass_normal, Some(true));
        assert_eq!(job.view_layer.use_pass_diffuse_color, Some(true));
    }

    #[test]
    fn test_denoise_node_flags() {
        let mut job = JobState::default();
        job.scene.use_nodes = true;
        let mut tree = tree_with_denoise();
        tree.nodes[1].use_gpu = Some(false);
        tree.nodes
            .push(CompositorNode::new("Denoise.001", NodeKind::Denoise));
        job.scene.node_tree = Some(tree);

        apply_denoiser_config(&mut job);

        let tree = job.scene.node_tree.as_ref().unwrap();
        // Present flag flipped on
        assert_eq!(tree.nodes[1].use_gpu, Some(true));
        // Absent flags stay absent, even on denoise nodes
        assert_eq!(tree.nodes[1].use_hdr, None);
        assert_eq!(tree.nodes[3].use_gpu, None);
        // Non-denoise nodes untouched
        assert_eq!(tree.nodes[0].use_gpu, None);
        assert_eq!(tree.nodes[2].use_gpu, None);
    }

    #[test]
    fn test_nodes_disabled_leaves_graph_alone() {
        let mut job = JobState::default();
        job.scene.use_nodes = false;
        let mut tree = tree_with_denoise();
        tree.nodes[1].use_gpu = Some(false);
        job.scene.node_tree = Some(tree);

        apply_denoiser_config(&mut job);

        let tree = job.scene.node_tree.as_ref().unwrap();
        assert_eq!(tree.nodes[1].use_gpu, Some(false));
    }

    #[test]
    fn test_configurator_never_fails_on_minimal_document() {
        // A document with every optional attribute missing configures cleanly
        let mut job = JobState::default();
        apply_denoiser_config(&mut job);
        assert!(job.scene.cycles.use_denoising);
    }
}
