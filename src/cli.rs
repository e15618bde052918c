use std::{
    fs,
    num::{NonZeroU32, NonZeroUsize},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::Parser;
use indicatif::ProgressBar;
use minimarch::{Config, render};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Render a scene of analytic volumes by sphere marching.
#[derive(Parser)]
#[command(name = "minimarch", version)]
struct Args {
    /// Scene file (TOML), the built-in demo scene is used when missing
    scene: Option<PathBuf>,

    /// Output image (.png), or the raw BGRA buffer with --raw
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Override the image width
    #[arg(long)]
    width: Option<u32>,

    /// Override the image height
    #[arg(long)]
    height: Option<u32>,

    /// Number of worker threads, one per core by default
    #[arg(short, long)]
    workers: Option<NonZeroUsize>,

    #[arg(long)]
    tile_size: Option<NonZeroU32>,

    /// Write the packed B, G, R, A bytes instead of a PNG
    #[arg(long)]
    raw: bool,

    /// Print the effective scene as TOML and exit
    #[arg(long)]
    dump_scene: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.scene {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(width) = args.width {
        config.camera.resolution[0] = width;
    }
    if let Some(height) = args.height {
        config.camera.resolution[1] = height;
    }
    if let Some(workers) = args.workers {
        config.render.workers = workers.get();
    }
    if let Some(tile_size) = args.tile_size {
        config.render.tile_size = tile_size.get();
    }
    config.validate()?;

    if args.dump_scene {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let camera = config.camera();
    let settings = config.render_settings();

    let bar = ProgressBar::no_length();
    let mut render_progress = render(config.scene(), camera, settings, |_| {}, {
        let bar = bar.clone();
        move |_, progress| {
            bar.update(|ps| {
                ps.set_len(progress.total as u64);
                ps.set_pos(progress.finished as u64)
            })
        }
    })?;
    bar.set_length(render_progress.progress().total as u64);

    render_progress.wait()?;
    bar.finish();

    let image = render_progress.image().lock().expect("Poisoned lock!");
    if args.raw {
        fs::write(&args.output, image.as_bytes())
            .with_context(|| format!("Writing {}", args.output.display()))?;
    } else {
        image
            .to_rgba_image()
            .save(&args.output)
            .with_context(|| format!("Writing {}", args.output.display()))?;
    }
    info!(output = %args.output.display(), "Saved");

    Ok(())
}
