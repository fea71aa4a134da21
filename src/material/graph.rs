/// Host-independent description of the shader graph built for a material
///
/// The layout mirrors what an artist would wire by hand in a node editor:
/// a principled BSDF feeding the material output, with image textures on
/// the left feeding its inputs.

use super::ResolvedMaterial;
use crate::props::TextureRole;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of shader node, with its per-kind payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    PrincipledBsdf,
    MaterialOutput,
    ImageTexture { label: String, image: PathBuf },
    NormalMap,
    SeparateRgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: usize,
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Editor location (x, y)
    pub location: (f32, f32),
}

/// One end of a link: node id plus socket name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socket {
    pub node: usize,
    pub socket: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub from: Socket,
    pub to: Socket,
}

/// Options controlling which optional branches get wired
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    /// Split the RMH map into roughness (R) and metallic (G)
    pub wire_rmh: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderGraph {
    pub material: String,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl ShaderGraph {
    fn empty(material: &str) -> Self {
        Self {
            material: material.to_string(),
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    fn add_node(&mut self, kind: NodeKind, location: (f32, f32)) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node { id, kind, location });
        id
    }

    fn link(&mut self, from: usize, output: &str, to: usize, input: &str) {
        self.links.push(Link {
            from: Socket { node: from, socket: output.to_string() },
            to: Socket { node: to, socket: input.to_string() },
        });
    }

    fn add_image(&mut self, role: TextureRole, image: PathBuf, location: (f32, f32)) -> usize {
        self.add_node(
            NodeKind::ImageTexture {
                label: role.label().to_string(),
                image,
            },
            location,
        )
    }

    /// Build the graph for a resolved material, always starting from scratch
    pub fn for_material(material: &ResolvedMaterial, options: GraphOptions) -> Self {
        let mut graph = Self::empty(&material.name);

        let bsdf = graph.add_node(NodeKind::PrincipledBsdf, (0.0, 0.0));
        let output = graph.add_node(NodeKind::MaterialOutput, (300.0, 0.0));
        graph.link(bsdf, "BSDF", output, "Surface");

        if let Some(path) = material.texture(TextureRole::BaseColorMap) {
            let tex = graph.add_image(TextureRole::BaseColorMap, path.to_path_buf(), (-400.0, 200.0));
            graph.link(tex, "Color", bsdf, "Base Color");
        }

        if let Some(path) = material.texture(TextureRole::NormalMap) {
            let tex = graph.add_image(TextureRole::NormalMap, path.to_path_buf(), (-400.0, 0.0));
            let normal_map = graph.add_node(NodeKind::NormalMap, (-200.0, 0.0));
            graph.link(tex, "Color", normal_map, "Color");
            graph.link(normal_map, "Normal", bsdf, "Normal");
        }

        if options.wire_rmh {
            if let Some(path) = material.texture(TextureRole::RMHMap) {
                let tex = graph.add_image(TextureRole::RMHMap, path.to_path_buf(), (-400.0, -200.0));
                let separate = graph.add_node(NodeKind::SeparateRgb, (-200.0, -200.0));
                graph.link(tex, "Color", separate, "Image");
                graph.link(separate, "R", bsdf, "Roughness");
                graph.link(separate, "G", bsdf, "Metallic");
            }
        }

        graph
    }

    /// Image nodes in the graph, as (label, image path)
    pub fn images(&self) -> impl Iterator<Item = (&str, &PathBuf)> {
        self.nodes.iter().filter_map(|node| match &node.kind {
            NodeKind::ImageTexture { label, image } => Some((label.as_str(), image)),
            _ => None,
        })
    }

    fn inputs_of(&self, node: usize) -> impl Iterator<Item = &str> {
        self.links
            .iter()
            .filter(move |link| link.to.node == node)
            .map(|link| link.to.socket.as_str())
    }

    /// Names of the BSDF inputs that have something connected
    pub fn connected_bsdf_inputs(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .find(|node| node.kind == NodeKind::PrincipledBsdf)
            .map(|bsdf| self.inputs_of(bsdf.id).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn material(roles: &[TextureRole]) -> ResolvedMaterial {
        let textures: BTreeMap<TextureRole, PathBuf> = roles
            .iter()
            .map(|role| (*role, PathBuf::from(format!("/tex/{}.png", role.key()))))
            .collect();
        ResolvedMaterial {
            name: "Metal".to_string(),
            textures,
        }
    }

    #[test]
    fn test_bare_material() {
        let graph = ShaderGraph::for_material(&material(&[]), GraphOptions::default());

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].to.socket, "Surface");
        assert!(graph.connected_bsdf_inputs().is_empty());
    }

    #[test]
    fn test_base_color_and_normal() {
        let graph = ShaderGraph::for_material(
            &material(&[TextureRole::BaseColorMap, TextureRole::NormalMap]),
            GraphOptions::default(),
        );

        assert_eq!(graph.connected_bsdf_inputs(), vec!["Base Color", "Normal"]);

        let images: Vec<_> = graph.images().map(|(label, _)| label).collect();
        assert_eq!(images, vec!["BaseColor", "Normal"]);

        let normal_map = graph
            .nodes
            .iter()
            .find(|n| n.kind == NodeKind::NormalMap)
            .unwrap();
        assert_eq!(normal_map.location, (-200.0, 0.0));
    }

    #[test]
    fn test_rmh_is_opt_in() {
        let mat = material(&TextureRole::ALL);

        let graph = ShaderGraph::for_material(&mat, GraphOptions::default());
        assert!(!graph.nodes.iter().any(|n| n.kind == NodeKind::SeparateRgb));
        assert_eq!(graph.images().count(), 2);

        let graph = ShaderGraph::for_material(&mat, GraphOptions { wire_rmh: true });
        assert_eq!(
            graph.connected_bsdf_inputs(),
            vec!["Base Color", "Normal", "Roughness", "Metallic"]
        );
    }

    #[test]
    fn test_json_shape() {
        let graph = ShaderGraph::for_material(
            &material(&[TextureRole::BaseColorMap]),
            GraphOptions::default(),
        );
        let value = serde_json::to_value(&graph).unwrap();

        assert_eq!(value["material"], "Metal");
        assert_eq!(value["nodes"][2]["type"], "ImageTexture");
        assert_eq!(value["nodes"][2]["label"], "BaseColor");
        assert_eq!(value["links"][1]["to"]["socket"], "Base Color");
    }
}
