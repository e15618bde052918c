use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use clap::Parser;
use eframe::{App, CreationContext, Frame, egui};
use egui::{CentralPanel, Color32, ColorImage, Image, TextureOptions};
use minimarch::{
    Camera, Config, RenderProgress, RenderSettings, Scene, ScreenBlock,
    frame::BgraImage,
    render,
    scene::Volume,
};
use tracing_subscriber::EnvFilter;

/// Preview a scene while it renders.
#[derive(Parser)]
#[command(name = "minimarch-gui", version)]
struct Args {
    /// Scene file (TOML), the built-in demo scene is used when missing
    scene: Option<PathBuf>,
}

pub struct MinimarchGui<V: Volume> {
    render_progress: RenderProgress<V>,
    texture: egui::TextureHandle,
    started: Arc<Mutex<Vec<ScreenBlock>>>,
    dirty: Arc<Mutex<Vec<ScreenBlock>>>,
}

impl<V: Volume + Send + Sync + 'static> MinimarchGui<V> {
    pub fn new(
        scene: Scene<V>,
        camera: Camera,
        render_settings: RenderSettings,
        cc: &CreationContext<'_>,
    ) -> anyhow::Result<Self> {
        let started = Arc::new(Mutex::new(Vec::new()));
        let tile_started_callback = {
            let started = Arc::clone(&started);
            let ctx = cc.egui_ctx.clone();
            move |tile| {
                started.lock().expect("Poisoned lock!").push(tile);
                ctx.request_repaint();
            }
        };
        let dirty = Arc::new(Mutex::new(Vec::new()));
        let tile_finished_callback = {
            let dirty = Arc::clone(&dirty);
            let ctx = cc.egui_ctx.clone();
            move |tile, _| {
                dirty.lock().expect("Poisoned lock!").push(tile);
                ctx.request_repaint();
            }
        };
        let screen_block = ScreenBlock::from_size(camera.get_resolution());
        let render_progress = render(
            scene,
            camera,
            render_settings,
            tile_started_callback,
            tile_finished_callback,
        )?;
        let texture = cc.egui_ctx.load_texture(
            "rendered",
            egui_image(
                &screen_block,
                &render_progress.image().lock().expect("Poisoned lock!"),
            ),
            TextureOptions::LINEAR,
        );

        Ok(MinimarchGui {
            render_progress,
            texture,
            started,
            dirty,
        })
    }
}

impl<V: Volume> App for MinimarchGui<V> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        for tile in self.started.lock().expect("Poisoned lock!").drain(..) {
            self.texture.set_partial(
                [tile.min.x as usize, tile.min.y as usize],
                egui_in_progress_tile(&tile),
                TextureOptions::LINEAR,
            );
        }

        {
            let mut dirty = self.dirty.lock().expect("Poisoned lock!");

            if !dirty.is_empty() {
                let img = self.render_progress.image().lock().expect("Poisoned lock!");

                for tile in dirty.drain(..) {
                    self.texture.set_partial(
                        [tile.min.x as usize, tile.min.y as usize],
                        egui_image(&tile, &img),
                        TextureOptions::LINEAR,
                    );
                }
            }
        }

        CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.add(Image::from_texture(&self.texture).shrink_to_fit())
            })
        });
    }
}

impl<V: Volume> Drop for MinimarchGui<V> {
    fn drop(&mut self) {
        self.render_progress.abort();
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.scene {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    eframe::run_native(
        "Minimarch GUI",
        Default::default(),
        Box::new(move |cc| {
            Ok(Box::new(MinimarchGui::new(
                config.scene(),
                config.camera(),
                config.render_settings(),
                cc,
            )?))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(())
}

/// Copies a block of the frame into an egui image.
fn egui_image(tile: &ScreenBlock, img: &BgraImage) -> ColorImage {
    let pixels = tile
        .internal_points()
        .map(|p| {
            let [b, g, r, a] = img.pixel(&p);
            Color32::from_rgba_unmultiplied(r, g, b, a)
        })
        .collect();
    ColorImage {
        size: [tile.width() as usize, tile.height() as usize],
        pixels,
    }
}

fn egui_in_progress_tile(tile: &ScreenBlock) -> ColorImage {
    let width = tile.width();
    let height = tile.height();
    let bw = 2;

    let pixels = tile
        .internal_points()
        .map(|p| {
            let offset = p - tile.min;
            let (x, y) = (offset.x, offset.y);
            let border = x < bw || y < bw || x + bw >= width || y + bw >= height;
            if border {
                Color32::from_rgba_unmultiplied(200, 100, 100, 255)
            } else {
                Color32::from_rgb(50, 50, 50)
            }
        })
        .collect();

    ColorImage {
        size: [width as usize, height as usize],
        pixels,
    }
}
