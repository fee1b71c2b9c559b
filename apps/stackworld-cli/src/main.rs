mod demo;
mod sheets;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use stackworld_assets::{ANGLE_BUCKETS, CACHE_SCALE, ViewCacheStore};
use stackworld_input::{Key, KeyState};
use stackworld_scene::{FrameStats, Scene, SceneConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stackworld-cli", about = "Headless sprite stacking renderer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, cache constants and the default scene config
    Info,
    /// Drive the demo world for a number of ticks and save the last frame
    Render {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "60")]
        ticks: u64,
        /// Seed for crate placement
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Number of crates to scatter
        #[arg(short, long, default_value = "100")]
        crates: usize,
        /// Keys held for the whole run, e.g. `--hold space --hold right`
        #[arg(long)]
        hold: Vec<String>,
        /// Scene config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Asset manifest whose sheets are loaded on top of the built-ins
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Where to write the upscaled frame
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
    },
    /// Inspect the pre-rendered views of an asset
    Cache {
        /// Asset name
        #[arg(default_value = sheets::CAR)]
        name: String,
        /// Asset manifest to load before looking the name up
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Directory to dump every cached view into as PNG
        #[arg(long)]
        dump: Option<PathBuf>,
    },
}

fn load_store(manifest: Option<&PathBuf>) -> anyhow::Result<ViewCacheStore> {
    let mut store = ViewCacheStore::new();
    sheets::register_builtin(&mut store)?;
    if let Some(path) = manifest {
        sheets::register_manifest(&mut store, path)?;
    }
    Ok(store)
}

fn parse_keys(names: &[String]) -> anyhow::Result<KeyState> {
    names
        .iter()
        .map(|name| Key::from_name(name).with_context(|| format!("unknown key '{name}'")))
        .collect()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("stackworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("view cache: buckets={ANGLE_BUCKETS}, scale={CACHE_SCALE}");
            println!(
                "default config: {}",
                serde_json::to_string_pretty(&SceneConfig::default())?
            );
        }
        Commands::Render {
            ticks,
            seed,
            crates,
            hold,
            config,
            manifest,
            output,
        } => {
            let config = match config {
                Some(path) => SceneConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => SceneConfig::default(),
            };
            let keys = parse_keys(&hold)?;
            let store = load_store(manifest.as_ref())?;

            let mut scene = Scene::new(config)?;
            demo::populate(&mut scene, &store, crates, seed)?;

            let mut last = FrameStats::default();
            for _ in 0..ticks {
                demo::apply_zoom_keys(scene.camera_mut(), &keys);
                last = scene.step(&keys)?;
            }
            if ticks == 0 {
                last = scene.render()?;
            }

            sheets::save_png(&scene.present(), &output)?;
            println!("{}", scene.summary());
            println!(
                "Last frame: drawn={} culled={} empty={} overlays={}",
                last.drawn, last.culled, last.empty, last.overlays
            );
            println!("Wrote {}", output.display());
        }
        Commands::Cache {
            name,
            manifest,
            dump,
        } => {
            let store = load_store(manifest.as_ref())?;
            let cache = store.get(&name)?;
            println!(
                "{name}: {}x{} x {} layers, {ANGLE_BUCKETS} views",
                cache.layer_width(),
                cache.layer_height(),
                cache.layer_count()
            );
            if let Some(dir) = &dump {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
            for index in 0..ANGLE_BUCKETS {
                let Some(view) = cache.cached_view(index) else {
                    bail!("cache for {name} is missing view {index}");
                };
                println!(
                    "  [{index:3}] {:.2}deg {}x{} center=({}, {})",
                    index as f64 * 360.0 / ANGLE_BUCKETS as f64,
                    view.image.width(),
                    view.image.height(),
                    view.center_x,
                    view.center_y
                );
                if let Some(dir) = &dump {
                    sheets::save_png(&view.image, &dir.join(format!("{name}_{index:03}.png")))?;
                }
            }
        }
    }

    Ok(())
}
