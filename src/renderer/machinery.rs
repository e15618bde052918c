use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use anyhow::anyhow;
use core_affinity::CoreId;
use tracing::{debug, info, warn};

use crate::{
    camera::Camera,
    frame::BgraImage,
    renderer::{RenderSettings, WorkerCount, stats::MarchStats, worker::Worker},
    scene::{Scene, Volume},
    screen_block::ScreenBlock,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileProgress {
    pub finished: usize,
    pub total: usize,
}

/// Starts rendering the frame in background threads.
///
/// Every pixel is independent, workers take tiles from a shared queue
/// (center of the image first) and copy them into the frame when done.
pub fn render<
    V: Volume + Send + Sync + 'static,
    F1: Fn(ScreenBlock) + Send + Sync + 'static,
    F2: Fn(ScreenBlock, TileProgress) + Send + Sync + 'static,
>(
    scene: Scene<V>,
    camera: Camera,
    settings: RenderSettings,
    started_tile_callback: F1,
    finished_tile_callback: F2,
) -> anyhow::Result<RenderProgress<V>> {
    if scene.is_empty() {
        warn!("Rendering an empty scene, only the sky will be visible");
    }

    let tile_ordering =
        ScreenBlock::from_size(camera.get_resolution()).tile_ordering(settings.tile_size);
    let tile_capacity = tile_ordering.iter().map(ScreenBlock::area).max().unwrap_or(0);
    let cores = worker_cores(settings.worker_count);

    info!(
        width = camera.get_resolution().x,
        height = camera.get_resolution().y,
        volumes = scene.volumes.len(),
        tiles = tile_ordering.len(),
        workers = cores.len(),
        "Starting render"
    );

    let state = Arc::new(RenderState {
        scene,
        camera,
        started: Instant::now(),

        image: Mutex::new(BgraImage::new(camera.get_resolution())),
        stats: Mutex::new(MarchStats::default()),

        tile_ordering,
        next_tile_index: AtomicUsize::new(0),
        finished_tiles: AtomicUsize::new(0),
    });
    let started_tile_callback = Arc::new(started_tile_callback);
    let finished_tile_callback = Arc::new(finished_tile_callback);

    let threads = cores
        .into_iter()
        .enumerate()
        .map(|(worker_id, core)| {
            let state = Arc::clone(&state);
            let started_tile_callback = Arc::clone(&started_tile_callback);
            let finished_tile_callback = Arc::clone(&finished_tile_callback);

            thread::Builder::new()
                .name(format!("worker{worker_id}"))
                .spawn(move || {
                    if let Some(core) = core {
                        core_affinity::set_for_current(core);
                    }

                    let mut worker = Worker::<V>::new(worker_id, tile_capacity);

                    while let Some(tile) = state.get_next_tile() {
                        (started_tile_callback)(*tile);

                        worker.render_tile(&state.scene, &state.camera, tile);
                        worker.write_tile(tile, &mut state.image.lock().expect("Poisoned lock!"));

                        let progress = TileProgress {
                            finished: state.finished_tiles.fetch_add(1, Ordering::AcqRel) + 1,
                            total: state.tile_ordering.len(),
                        };
                        (finished_tile_callback)(*tile, progress);
                    }

                    debug!(worker = worker.id(), stats = %worker.stats(), "Worker done");
                    let mut stats = state.stats.lock().expect("Poisoned lock!");
                    *stats = stats.merge(worker.stats());
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RenderProgress {
        render_state: state,
        threads,
    })
}

/// Renders the whole frame and waits for the result.
pub fn render_blocking<V: Volume + Send + Sync + 'static>(
    scene: Scene<V>,
    camera: Camera,
    settings: RenderSettings,
) -> anyhow::Result<BgraImage> {
    let mut progress = render(scene, camera, settings, |_| {}, |_, _| {})?;
    progress.wait()?;
    Ok(progress.image().lock().expect("Poisoned lock!").clone())
}

/// One entry per worker thread, with the core to pin it to.
fn worker_cores(worker_count: WorkerCount) -> Vec<Option<CoreId>> {
    match worker_count {
        WorkerCount::Auto => match core_affinity::get_core_ids() {
            Some(ids) if !ids.is_empty() => ids.into_iter().map(Some).collect(),
            _ => {
                warn!("Could not read the CPU list, workers will not be pinned");
                vec![None; num_cpus::get()]
            }
        },
        WorkerCount::Manual(count) => vec![None; count.get()],
    }
}

pub struct RenderProgress<V: Volume> {
    render_state: Arc<RenderState<V>>,
    threads: Vec<JoinHandle<()>>,
}

impl<V: Volume> RenderProgress<V> {
    /// Return number of processed and total tiles.
    pub fn progress(&self) -> TileProgress {
        TileProgress {
            finished: self.render_state.finished_tiles.load(Ordering::Acquire),
            total: self.render_state.tile_ordering.len(),
        }
    }

    pub fn progress_percent(&self) -> f32 {
        let progress = self.progress();
        if progress.total == 0 {
            100.0
        } else {
            100.0 * (progress.finished as f32) / (progress.total as f32)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.threads.iter().all(|handle| handle.is_finished())
    }

    /// Signal the workers to abort.
    /// Any running workers will still finish their tiles, but no new ones will be started.
    pub fn abort(&self) {
        self.render_state
            .next_tile_index
            .store(self.render_state.tile_ordering.len(), Ordering::Release);
    }

    /// Blocks until all workers finish.
    pub fn wait(&mut self) -> anyhow::Result<()> {
        let panicked = self
            .threads
            .drain(..)
            .map(|handle| handle.join())
            .filter(Result::is_err)
            .count();

        if panicked > 0 {
            return Err(anyhow!("{panicked} render worker(s) panicked"));
        }

        info!(
            elapsed = ?self.elapsed(),
            stats = %self.stats(),
            "Render finished"
        );
        Ok(())
    }

    /// Time since the render started.
    pub fn elapsed(&self) -> Duration {
        self.render_state.started.elapsed()
    }

    pub fn image(&self) -> &Mutex<BgraImage> {
        &self.render_state.image
    }

    /// Statistics of the workers that already finished.
    pub fn stats(&self) -> MarchStats {
        self.render_state
            .stats
            .lock()
            .expect("Poisoned lock!")
            .clone()
    }
}

struct RenderState<V: Volume> {
    scene: Scene<V>,
    camera: Camera,
    started: Instant,

    image: Mutex<BgraImage>,
    stats: Mutex<MarchStats>,

    tile_ordering: Vec<ScreenBlock>,
    next_tile_index: AtomicUsize,
    finished_tiles: AtomicUsize,
}

impl<V: Volume> RenderState<V> {
    fn get_next_tile(&self) -> Option<&ScreenBlock> {
        let id = self.next_tile_index.fetch_add(1, Ordering::AcqRel);
        self.tile_ordering.get(id)
    }
}
