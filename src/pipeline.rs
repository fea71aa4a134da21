/// Material application pipeline: props lookup -> extraction -> texture
/// lookup -> material build, one material at a time
///
/// Every miss along the way is a warning, never an abort. A material whose
/// props file is missing is skipped; a texture that cannot be found leaves
/// its role unwired.

use crate::config::Settings;
use crate::exclusions::ExclusionList;
use crate::locate::locate;
use crate::material::{MaterialSink, ResolvedMaterial};
use crate::props::{props_file_name, PropsExtractor, PropsIssue, TextureRole};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Something that went wrong for one material without stopping the run
#[derive(Debug, Error)]
pub enum RunWarning {
    #[error("{material}: props not found: {file}")]
    PropsNotFound { material: String, file: String },

    #[error("{material}: could not read props: {error}")]
    PropsUnreadable { material: String, error: String },

    #[error("{material}: {issue}")]
    MalformedKey { material: String, issue: PropsIssue },

    #[error("{material}: {role} texture not found: {file}")]
    TextureNotFound {
        material: String,
        role: TextureRole,
        file: String,
    },

    #[error("{material}: build failed: {error}")]
    BuildFailed { material: String, error: String },
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub requested: usize,
    pub applied: usize,
    pub excluded: usize,
    pub props_missing: usize,
    pub textures_wired: usize,
    pub textures_missing: usize,
    pub malformed_keys: usize,
    pub failed: usize,
    pub warnings: Vec<RunWarning>,
    pub duration: Duration,
}

impl RunReport {
    fn warn(&mut self, warning: RunWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Material Summary ===")?;
        writeln!(f, "Materials requested: {}", self.requested)?;
        writeln!(f, "  Applied: {}", self.applied)?;
        writeln!(f, "  Excluded: {}", self.excluded)?;
        writeln!(f, "  Props not found: {}", self.props_missing)?;
        writeln!(f, "  Failed: {}", self.failed)?;
        writeln!(f, "Textures wired: {}", self.textures_wired)?;
        writeln!(f, "Textures not found: {}", self.textures_missing)?;
        writeln!(f, "Malformed keys: {}", self.malformed_keys)?;
        write!(f, "Duration: {:.2?}", self.duration)
    }
}

/// Everything a run needs, with the root folder passed in explicitly
pub struct Pipeline {
    root: PathBuf,
    extractor: PropsExtractor,
    exclusions: ExclusionList,
}

impl Pipeline {
    pub fn new(root: impl AsRef<Path>, settings: &Settings) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extractor: PropsExtractor::new(&settings.roles)
                .with_extension(settings.texture_extension.clone()),
            exclusions: ExclusionList::new(&settings.exclude),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Apply every named material in order
    pub fn apply<S: AsRef<str>>(&self, materials: &[S], sink: &mut dyn MaterialSink) -> RunReport {
        self.run(materials, sink, None)
    }

    /// Like [`apply`](Self::apply), with a progress bar on stderr
    pub fn apply_with_progress<S: AsRef<str>>(
        &self,
        materials: &[S],
        sink: &mut dyn MaterialSink,
    ) -> RunReport {
        let pb = ProgressBar::new(materials.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        let report = self.run(materials, sink, Some(&pb));
        pb.finish_with_message("done");
        report
    }

    fn run<S: AsRef<str>>(
        &self,
        materials: &[S],
        sink: &mut dyn MaterialSink,
        pb: Option<&ProgressBar>,
    ) -> RunReport {
        info!("Applying {} materials from {:?}", materials.len(), self.root);
        let start = Instant::now();
        let mut report = RunReport {
            requested: materials.len(),
            ..RunReport::default()
        };

        for material in materials {
            let material = material.as_ref();
            if let Some(pb) = pb {
                pb.set_message(material.to_string());
            }

            self.apply_one(material, sink, &mut report);

            if let Some(pb) = pb {
                pb.inc(1);
            }
        }

        report.duration = start.elapsed();
        report
    }

    fn apply_one(&self, material: &str, sink: &mut dyn MaterialSink, report: &mut RunReport) {
        if self.exclusions.should_exclude(material) {
            debug!("Excluded: {}", material);
            report.excluded += 1;
            return;
        }

        let props_file = props_file_name(material);
        let Some(props_path) = locate(&self.root, &props_file) else {
            report.props_missing += 1;
            report.warn(RunWarning::PropsNotFound {
                material: material.to_string(),
                file: props_file,
            });
            return;
        };

        let (record, issues) = match self.extractor.read_file(&props_path) {
            Ok(extracted) => extracted,
            Err(e) => {
                report.failed += 1;
                report.warn(RunWarning::PropsUnreadable {
                    material: material.to_string(),
                    error: format!("{:#}", e),
                });
                return;
            }
        };

        for issue in issues {
            report.malformed_keys += 1;
            report.warn(RunWarning::MalformedKey {
                material: material.to_string(),
                issue,
            });
        }

        let mut resolved = ResolvedMaterial::new(material);
        for (role, file_name) in record.iter() {
            match locate(&self.root, file_name) {
                Some(path) => {
                    resolved.textures.insert(role, path);
                    report.textures_wired += 1;
                }
                None => {
                    report.textures_missing += 1;
                    report.warn(RunWarning::TextureNotFound {
                        material: material.to_string(),
                        role,
                        file: file_name.to_string(),
                    });
                }
            }
        }

        match sink.build(&resolved) {
            Ok(()) => {
                debug!("Applied {} ({} textures)", material, resolved.textures.len());
                report.applied += 1;
            }
            Err(e) => {
                report.failed += 1;
                report.warn(RunWarning::BuildFailed {
                    material: material.to_string(),
                    error: format!("{:#}", e),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;

    #[derive(Default)]
    struct Collect {
        built: Vec<ResolvedMaterial>,
        fail_on: Option<&'static str>,
    }

    impl MaterialSink for Collect {
        fn build(&mut self, material: &ResolvedMaterial) -> Result<()> {
            if self.fail_on == Some(material.name.as_str()) {
                anyhow::bail!("host refused");
            }
            self.built.push(material.clone());
            Ok(())
        }
    }

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "foo/bar/Metal.props.txt",
            "Name=BaseColorMap ParameterValue=Texture2D'/Game/Tex/Metal_BaseColor.Metal_BaseColor'\n\
             Name=NormalMap ParameterValue=Texture2D'/Game/Tex/Metal_N.Metal_N'\n\
             Name=RMHMap ParameterValue=None\n",
        );
        write(dir.path(), "foo/Metal_BaseColor.png", "");
        write(dir.path(), "textures/normals/Metal_N.png", "");
        dir
    }

    #[test]
    fn test_applies_found_textures() {
        let dir = fixture();
        let pipeline = Pipeline::new(dir.path(), &Settings::default());
        let mut sink = Collect::default();

        let report = pipeline.apply(&["Metal"], &mut sink);

        assert_eq!(report.applied, 1);
        assert_eq!(report.textures_wired, 2);
        assert_eq!(report.malformed_keys, 1);
        assert_eq!(sink.built.len(), 1);

        let metal = &sink.built[0];
        assert_eq!(
            metal.texture(TextureRole::BaseColorMap),
            Some(dir.path().join("foo/Metal_BaseColor.png").as_path())
        );
        assert_eq!(
            metal.texture(TextureRole::NormalMap),
            Some(dir.path().join("textures/normals/Metal_N.png").as_path())
        );
        assert_eq!(metal.texture(TextureRole::RMHMap), None);
    }

    #[test]
    fn test_missing_props_continues() {
        let dir = fixture();
        let pipeline = Pipeline::new(dir.path(), &Settings::default());
        let mut sink = Collect::default();

        let report = pipeline.apply(&["Ghost", "Metal"], &mut sink);

        assert_eq!(report.requested, 2);
        assert_eq!(report.props_missing, 1);
        assert_eq!(report.applied, 1);
        assert!(matches!(
            &report.warnings[0],
            RunWarning::PropsNotFound { file, .. } if file == "Ghost.props.txt"
        ));
    }

    #[test]
    fn test_missing_texture_leaves_role_unwired() {
        let dir = fixture();
        fs::remove_file(dir.path().join("textures/normals/Metal_N.png")).unwrap();
        let pipeline = Pipeline::new(dir.path(), &Settings::default());
        let mut sink = Collect::default();

        let report = pipeline.apply(&["Metal"], &mut sink);

        assert_eq!(report.applied, 1);
        assert_eq!(report.textures_missing, 1);
        assert_eq!(sink.built[0].textures.len(), 1);
        assert!(report.warnings.iter().any(|w| matches!(
            w,
            RunWarning::TextureNotFound { role: TextureRole::NormalMap, file, .. } if file == "Metal_N.png"
        )));
    }

    #[test]
    fn test_exclusions_and_role_selection() {
        let dir = fixture();
        let settings = Settings {
            roles: vec![TextureRole::NormalMap],
            exclude: vec!["Skip*".to_string()],
            ..Settings::default()
        };
        let pipeline = Pipeline::new(dir.path(), &settings);
        let mut sink = Collect::default();

        let report = pipeline.apply(&["SkipMe", "Metal"], &mut sink);

        assert_eq!(report.excluded, 1);
        assert_eq!(report.malformed_keys, 0);
        assert_eq!(sink.built.len(), 1);
        assert_eq!(sink.built[0].textures.keys().copied().collect::<Vec<_>>(), vec![TextureRole::NormalMap]);
    }

    #[test]
    fn test_sink_failure_is_not_fatal() {
        let dir = fixture();
        write(dir.path(), "Wood.props.txt", "nothing useful");
        let pipeline = Pipeline::new(dir.path(), &Settings::default());
        let mut sink = Collect {
            fail_on: Some("Metal"),
            ..Collect::default()
        };

        let report = pipeline.apply(&["Metal", "Wood"], &mut sink);

        assert_eq!(report.failed, 1);
        assert_eq!(report.applied, 1);
        assert_eq!(sink.built[0].name, "Wood");
        assert!(sink.built[0].textures.is_empty());
    }

    #[test]
    fn test_report_summary() {
        let report = RunReport {
            requested: 3,
            applied: 2,
            props_missing: 1,
            ..RunReport::default()
        };
        let text = report.to_string();
        assert!(text.contains("Materials requested: 3"));
        assert!(text.contains("Props not found: 1"));
    }
}
