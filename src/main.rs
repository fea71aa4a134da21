use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use material_autoloader::config::{expand_path, Settings};
use material_autoloader::locate::{find_props_files, locate};
use material_autoloader::material::{DryRunSink, GraphExporter, GraphOptions, MaterialSink};
use material_autoloader::pipeline::{Pipeline, RunReport};
use material_autoloader::props::PropsExtractor;

#[derive(Parser)]
#[command(name = "material-autoloader")]
#[command(version = "1.1.0")]
#[command(about = "Apply textures to materials from .props.txt dumps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the textures referenced by a props file
    Extract {
        /// Path to a .props.txt file
        #[arg(long)]
        props: PathBuf,

        /// Print the mapping as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Find a file by name anywhere under the root folder
    Locate {
        /// Root folder to search
        #[arg(long)]
        root: Option<String>,

        /// Exact file name to look for
        name: String,
    },

    /// Apply the named materials
    Apply {
        #[command(flatten)]
        run: RunArgs,

        /// File listing material names, one per line
        #[arg(long)]
        materials_file: Option<PathBuf>,

        /// Material names (props file is <name>.props.txt)
        materials: Vec<String>,
    },

    /// Apply every material that has a props file under the root folder
    Scan {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Show or create the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Root folder holding props files and textures
    #[arg(long)]
    root: Option<String>,

    /// Output directory for shader graphs
    #[arg(long)]
    output: Option<String>,

    /// Wire the RMH map into roughness and metallic
    #[arg(long)]
    rmh: bool,

    /// Skip materials matching this pattern (repeatable)
    #[arg(long)]
    exclude: Vec<String>,

    /// Log what would be built without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Write default settings if the file does not exist yet
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // If RUST_LOG is set, use it; otherwise use cli.verbose flag
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
    } else {
        env_logger::Builder::new()
            .filter_level(if cli.verbose {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            })
            .init();
    }

    let config_path = cli.config.clone().unwrap_or_else(Settings::config_path);
    let mut settings = Settings::load_from(&config_path)?;

    match cli.command {
        Commands::Extract { props, json } => {
            extract_props(&props, &settings, json)?;
        }
        Commands::Locate { root, name } => {
            if let Some(root) = root {
                settings.root_path = root;
            }
            let root = settings.root_dir(&config_path)?;
            match locate(&root, &name) {
                Some(path) => println!("{}", path.display()),
                None => anyhow::bail!("{} not found under {:?}", name, root),
            }
        }
        Commands::Apply { run, materials_file, materials } => {
            run.apply_to(&mut settings);
            let root = settings.root_dir(&config_path)?;

            let mut names = materials;
            if let Some(file) = materials_file {
                names.extend(read_material_list(&file)?);
            }
            if names.is_empty() {
                anyhow::bail!("No materials given (pass names or --materials-file)");
            }

            let pipeline = Pipeline::new(root, &settings);
            run_materials(&pipeline, &names, &settings, run.dry_run, false)?;
        }
        Commands::Scan { run } => {
            run.apply_to(&mut settings);
            let root = settings.root_dir(&config_path)?;

            info!("=== Scanning {:?} for props files ===", root);
            let props_files = find_props_files(&root);
            info!("Found {} props files", props_files.len());
            if props_files.is_empty() {
                return Ok(());
            }

            let names: Vec<String> = props_files.into_iter().map(|p| p.material).collect();
            let pipeline = Pipeline::new(root, &settings);
            run_materials(&pipeline, &names, &settings, run.dry_run, true)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                info!("Settings file: {:?}", config_path);
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            ConfigAction::Init => {
                if config_path.exists() {
                    info!("Settings already exist at {:?}", config_path);
                } else {
                    Settings::default().save_to(&config_path)?;
                    info!("Wrote default settings to {:?}", config_path);
                }
            }
        },
    }

    Ok(())
}

impl RunArgs {
    /// Command-line values win over the settings file for this run
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(root) = &self.root {
            settings.root_path = root.clone();
        }
        if let Some(output) = &self.output {
            settings.output_path = output.clone();
        }
        if self.rmh {
            settings.wire_rmh = true;
        }
        settings.exclude.extend(self.exclude.iter().cloned());
    }
}

fn extract_props(path: &Path, settings: &Settings, json: bool) -> Result<()> {
    let extractor = PropsExtractor::new(&settings.roles)
        .with_extension(settings.texture_extension.clone());
    let path = expand_path(&path.to_string_lossy());
    let (record, issues) = extractor.read_file(&path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        info!("=== Textures in {:?} ===", path);
        for role in extractor.roles() {
            match record.get(*role) {
                Some(name) => info!("  {}: {}", role, name),
                None => info!("  {}: -", role),
            }
        }
    }

    for issue in &issues {
        log::warn!("{}", issue);
    }
    Ok(())
}

/// Material names from a list file; blank lines and `#` comments are skipped
fn read_material_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read material list {:?}", path))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

fn run_materials(
    pipeline: &Pipeline,
    names: &[String],
    settings: &Settings,
    dry_run: bool,
    progress: bool,
) -> Result<()> {
    let options = GraphOptions { wire_rmh: settings.wire_rmh };

    let run = |sink: &mut dyn MaterialSink| -> RunReport {
        if progress {
            pipeline.apply_with_progress(names, sink)
        } else {
            pipeline.apply(names, sink)
        }
    };

    let report = if dry_run {
        let mut sink = DryRunSink::new(options);
        run(&mut sink)
    } else {
        let mut sink = GraphExporter::new(settings.output_dir(), options);
        let report = run(&mut sink);
        info!(
            "Wrote {} shader graphs to {:?}",
            sink.written().len(),
            settings.output_dir()
        );
        report
    };

    info!("\n{}", report);
    Ok(())
}
