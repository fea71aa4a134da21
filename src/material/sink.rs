/// Material sinks: the adapters that turn a resolved material into
/// something a renderer or editor can load

use super::{GraphOptions, ResolvedMaterial, ShaderGraph};
use anyhow::{Context, Result};
use itertools::Itertools;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Builds a material from its resolved textures
pub trait MaterialSink {
    fn build(&mut self, material: &ResolvedMaterial) -> Result<()>;
}

/// Writes one `<material>.material.json` shader graph per material
pub struct GraphExporter {
    output_dir: PathBuf,
    options: GraphOptions,
    written: Vec<PathBuf>,
}

impl GraphExporter {
    pub fn new(output_dir: impl AsRef<Path>, options: GraphOptions) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            options,
            written: Vec::new(),
        }
    }

    /// Output file for a material
    pub fn graph_path(&self, material: &str) -> PathBuf {
        self.output_dir.join(format!("{}.material.json", material))
    }

    /// Files written so far, in build order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl MaterialSink for GraphExporter {
    fn build(&mut self, material: &ResolvedMaterial) -> Result<()> {
        let graph = ShaderGraph::for_material(material, self.options);

        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", self.output_dir))?;

        let path = self.graph_path(&material.name);
        let content = serde_json::to_string_pretty(&graph)?;
        // Rebuilding a material replaces its previous graph
        fs::write(&path, content)
            .with_context(|| format!("Failed to write shader graph {:?}", path))?;

        debug!("Wrote {} nodes, {} links to {:?}", graph.nodes.len(), graph.links.len(), path);
        self.written.push(path);
        Ok(())
    }
}

/// Logs what would be built without touching the filesystem
#[derive(Default)]
pub struct DryRunSink {
    options: GraphOptions,
    pub built: Vec<String>,
}

impl DryRunSink {
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            built: Vec::new(),
        }
    }
}

impl MaterialSink for DryRunSink {
    fn build(&mut self, material: &ResolvedMaterial) -> Result<()> {
        let graph = ShaderGraph::for_material(material, self.options);
        let inputs = graph.connected_bsdf_inputs();
        info!(
            "[dry run] {}: {}",
            material.name,
            if inputs.is_empty() {
                "no textures wired".to_string()
            } else {
                inputs.iter().join(", ")
            }
        );
        for (label, image) in graph.images() {
            info!("    {} <- {:?}", label, image);
        }
        self.built.push(material.name.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::TextureRole;

    #[test]
    fn test_exporter_writes_graph() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("graphs");
        let mut exporter = GraphExporter::new(&out, GraphOptions::default());

        let mut material = ResolvedMaterial::new("Metal");
        material
            .textures
            .insert(TextureRole::NormalMap, PathBuf::from("/tex/Metal_N.png"));
        exporter.build(&material).unwrap();

        let path = out.join("Metal.material.json");
        assert_eq!(exporter.written(), &[path.clone()]);

        let graph: ShaderGraph = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(graph, ShaderGraph::for_material(&material, GraphOptions::default()));
    }

    #[test]
    fn test_rebuild_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = GraphExporter::new(dir.path(), GraphOptions::default());

        let mut material = ResolvedMaterial::new("Wood");
        material
            .textures
            .insert(TextureRole::BaseColorMap, PathBuf::from("/tex/Wood_D.png"));
        exporter.build(&material).unwrap();

        material.textures.clear();
        exporter.build(&material).unwrap();

        let graph: ShaderGraph =
            serde_json::from_str(&fs::read_to_string(exporter.graph_path("Wood")).unwrap()).unwrap();
        assert_eq!(graph.images().count(), 0);
    }

    #[test]
    fn test_dry_run_records_names() {
        let mut sink = DryRunSink::default();
        sink.build(&ResolvedMaterial::new("Glass")).unwrap();
        assert_eq!(sink.built, vec!["Glass".to_string()]);
    }
}
