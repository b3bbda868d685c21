use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use harbor_animate::{AnimationParams, Animator, ParamSpec};
use harbor_assets::{AssetStore, ModelInfo, ModelLoader, inspect_gltf};
use harbor_kernel::Scene;
use harbor_render::{DebugTextRenderer, RenderView, Renderer};
use harbor_scene::{Composition, HarborConfig, ModelKind, compose_harbor, install_model};
use harbor_tools::SceneInspector;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "harbor-cli", about = "Headless tool for the harbor scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the composed scene layout
    Info,
    /// List tunable parameters with their ranges and current values
    Params,
    /// Step the animation headlessly and dump the resulting scene
    Simulate {
        /// Number of frames to step
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Seconds per frame
        #[arg(short, long, default_value = "0.016")]
        delta: f32,
        /// Override a parameter, e.g. `--set cloudSpeed=0.5`
        #[arg(short, long, value_parser = parse_assignment)]
        set: Vec<(String, f32)>,
        /// Frame at which models become available
        #[arg(long, default_value = "0")]
        load_after: u64,
        /// Read model files from the assets directory instead of placeholders
        #[arg(long)]
        from_disk: bool,
    },
    /// Read a glTF/GLB file and print what it declares
    Import {
        path: PathBuf,
        /// Add the model to a JSON asset registry
        #[arg(short, long)]
        registry: Option<PathBuf>,
    },
    /// Validate a configuration file and print the sanitized result
    CheckConfig { path: PathBuf },
}

fn parse_assignment(raw: &str) -> Result<(String, f32), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value for {name}: {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Info => {
            let config = HarborConfig::load_or_default(cli.config.as_deref())?;
            let Composition { scene, rig } = compose_harbor(&config);
            println!("harbor-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", SceneInspector::summary(&scene));
            println!("clouds: {}", rig.clouds.len());
            for kind in ModelKind::ALL {
                println!(
                    "model {kind}: {}",
                    config.assets.model_path(kind).display()
                );
            }
        }
        Commands::Params => {
            let config = HarborConfig::load_or_default(cli.config.as_deref())?;
            print_params(&config.animation);
        }
        Commands::Simulate {
            frames,
            delta,
            set,
            load_after,
            from_disk,
        } => {
            let config = HarborConfig::load_or_default(cli.config.as_deref())?;
            let mut params = config.animation;
            for (name, value) in &set {
                let change = params
                    .set_by_name(name, *value)
                    .with_context(|| format!("--set {name}={value}"))?;
                tracing::debug!(?change, "override");
            }
            let scene = simulate(&config, params, frames, delta, load_after, from_disk)?;

            let view = RenderView {
                eye: glam::Vec3::from(config.camera.eye),
                target: glam::Vec3::from(config.camera.target),
                fov_degrees: config.camera.fov_degrees,
            };
            print!("{}", DebugTextRenderer::new().render(&scene, &view));
            println!("{}", SceneInspector::summary(&scene));
        }
        Commands::Import { path, registry } => {
            let info = inspect_gltf(&path)?;
            println!(
                "{}: {} nodes, {} meshes",
                info.source,
                info.node_count,
                info.mesh_count()
            );
            for name in &info.mesh_names {
                println!("  mesh {name}");
            }
            for (name, color) in &info.materials {
                println!(
                    "  material {name} [{:.2}, {:.2}, {:.2}, {:.2}]",
                    color[0], color[1], color[2], color[3]
                );
            }
            if let Some(registry) = registry {
                let mut store = if registry.exists() {
                    AssetStore::load(&registry)?
                } else {
                    AssetStore::new()
                };
                let ids = store.register_model(&info);
                store.save(&registry)?;
                println!(
                    "registry {}: +{} ids, {} assets",
                    registry.display(),
                    ids.len(),
                    store.len()
                );
            }
        }
        Commands::CheckConfig { path } => {
            let config = HarborConfig::load(&path)?;
            print!("{}", config.to_yaml_string()?);
        }
    }

    Ok(())
}

fn print_params(params: &AnimationParams) {
    for spec in ParamSpec::all() {
        println!(
            "{:<20} {:<24} [{} .. {}] step {}  = {}",
            spec.key.name(),
            spec.label,
            spec.min,
            spec.max,
            spec.step,
            params.get(spec.key)
        );
    }
}

/// Step `frames` frames of `delta` seconds. Models appear at `load_after`.
fn simulate(
    config: &HarborConfig,
    params: AnimationParams,
    frames: u64,
    delta: f32,
    load_after: u64,
    from_disk: bool,
) -> anyhow::Result<Scene> {
    let Composition { mut scene, rig } = compose_harbor(config);
    let mut animator = Animator::new(rig);
    let models = if from_disk {
        load_from_disk(config)?
    } else {
        ModelKind::ALL
            .iter()
            .map(|kind| (*kind, ModelInfo::placeholder(kind.name())))
            .collect()
    };
    let mut pending = Some(models);

    for frame in 0..frames {
        if frame >= load_after {
            for (kind, info) in pending.take().unwrap_or_default() {
                install_model(kind, &info, &mut scene, animator.rig_mut())?;
            }
        }
        animator.update(delta, &params, &mut scene);
    }
    Ok(scene)
}

fn load_from_disk(config: &HarborConfig) -> anyhow::Result<Vec<(ModelKind, ModelInfo)>> {
    let mut loader = ModelLoader::new();
    for kind in ModelKind::ALL {
        loader.request(kind, config.assets.model_path(kind))?;
    }
    let outcomes = loader.wait(Duration::from_secs(30));
    if loader.in_flight() > 0 {
        bail!("{} model loads did not finish", loader.in_flight());
    }

    let mut models = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(info) => models.push((outcome.key, info)),
            Err(e) => {
                eprintln!("{} ({}): {e}", outcome.key, outcome.path.display());
            }
        }
    }
    models.sort_by_key(|(kind, _)| *kind);
    Ok(models)
}
