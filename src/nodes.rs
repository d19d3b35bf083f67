//! Compositor node graph model
//!
//! A snapshot of the scene's compositing node tree, carried in the job
//! document. The tool only inspects and edits DENOISE nodes; every other
//! node kind is preserved verbatim so a round-tripped document keeps
//! graphs this tool knows nothing about.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Node kind identifier as reported by the host (`node.type`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    #[strum(serialize = "DENOISE")]
    Denoise,
    #[strum(serialize = "R_LAYERS")]
    RenderLayers,
    #[strum(serialize = "COMPOSITE")]
    Composite,
    #[strum(serialize = "VIEWER")]
    Viewer,
    /// Any kind this tool does not inspect, kept as its original token
    #[strum(default)]
    Other(String),
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        // FromStr cannot fail here, the default variant absorbs unknown tokens
        value.parse().unwrap_or_else(|_| Self::Other(value))
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        value.to_string()
    }
}

/// One compositor node from the host graph
///
/// `use_gpu` and `use_hdr` only exist on DENOISE nodes of newer host
/// versions; absent attributes stay `None` and are never invented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositorNode {
    pub name: String,
    // The host calls this attribute `type`, which Rust reserves
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_gpu: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_hdr: Option<bool>,
}

impl CompositorNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            use_gpu: None,
            use_hdr: None,
        }
    }

    /// Check whether this is a DENOISE node
    pub fn is_denoise(&self) -> bool {
        matches!(self.kind, NodeKind::Denoise)
    }
}

/// The scene's compositing node tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTree {
    #[serde(default)]
    pub nodes: Vec<CompositorNode>,
}

impl NodeTree {
    /// Check whether the graph contains at least one DENOISE node
    pub fn has_denoise_node(&self) -> bool {
        self.nodes.iter().any(|n| n.is_denoise())
    }

    /// Iterate over every DENOISE node for in-place edits
    pub fn denoise_nodes_mut(&mut self) -> impl Iterator<Item = &mut CompositorNode> {
        self.nodes.iter_mut().filter(|n| n.is_denoise())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_node_kind_tokens() {
        assert_eq!(NodeKind::Denoise.to_string(), "DENOISE");
        assert_eq!(NodeKind::RenderLayers.to_string(), "R_LAYERS");
        assert_eq!(NodeKind::from_str("DENOISE").unwrap(), NodeKind::Denoise);
    }

    #[test]
    fn test_unknown_kind_preserved() {
        let kind = NodeKind::from("GLARE".to_string());
        assert_eq!(kind, NodeKind::Other("GLARE".to_string()));
        assert_eq!(kind.to_string(), "GLARE");
    }

    #[test]
    fn test_unknown_kind_survives_json_roundtrip() {
        let node = CompositorNode::new("Glare", NodeKind::Other("GLARE".to_string()));
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"GLARE\""));
        let parsed: CompositorNode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, node);
    }

    #[test]
    fn test_absent_node_attributes_not_serialized() {
        let node = CompositorNode::new("Denoise", NodeKind::Denoise);
        let json = serde_json::to_string(&node).unwrap();
        assert!(!json.contains("use_gpu"));
        assert!(!json.contains("use_hdr"));
    }

    #[test]
    fn test_has_denoise_node() {
        let mut tree = NodeTree::default();
        tree.nodes
            .push(CompositorNode::new("Render Layers", NodeKind::RenderLayers));
        tree.nodes
            .push(CompositorNode::new("Composite", NodeKind::Composite));
        assert!(!tree.has_denoise_node());

        tree.nodes
            .push(CompositorNode::new("Denoise", NodeKind::Denoise));
        assert!(tree.has_denoise_node());
    }

    #[test]
    fn test_denoise_nodes_mut_filters() {
        let mut tree = NodeTree {
            nodes: vec![
                CompositorNode::new("Denoise", NodeKind::Denoise),
                CompositorNode::new("Viewer", NodeKind::Viewer),
                CompositorNode::new("Denoise.001", NodeKind::Denoise),
            ],
        };
        assert_eq!(tree.denoise_nodes_mut().count(), 2);
    }
}
