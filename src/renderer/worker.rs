use std::marker::PhantomData;

use crate::{
    camera::Camera,
    frame::BgraImage,
    renderer::stats::MarchStats,
    scene::{Scene, Volume},
    screen_block::ScreenBlock,
    shading::shade_pixel,
    util::pack_bgra,
};

pub struct Worker<V: Volume> {
    id: usize,
    /// Packed pixels of the tile being rendered
    buffer: Vec<[u8; 4]>,
    stats: MarchStats,
    _phantom: PhantomData<V>,
}

impl<V: Volume> Worker<V> {
    /// `capacity` is the pixel count of the largest tile the worker will render.
    pub fn new(id: usize, capacity: usize) -> Self {
        Self {
            id,
            buffer: Vec::with_capacity(capacity),
            stats: MarchStats::default(),
            _phantom: Default::default(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn stats(&self) -> &MarchStats {
        &self.stats
    }

    /// Renders the tile into the worker's buffer.
    pub fn render_tile(&mut self, scene: &Scene<V>, camera: &Camera, tile: &ScreenBlock) {
        self.buffer.clear();
        for point in tile.internal_points() {
            let sample = shade_pixel(camera, &scene.volumes, &point);
            self.stats.add_pixel(sample.hit.as_ref());
            self.buffer.push(pack_bgra(sample.color));
        }
    }

    /// Copies the last rendered tile into the frame.
    pub fn write_tile(&self, tile: &ScreenBlock, image: &mut BgraImage) {
        image.write_tile(tile, &self.buffer);
    }
}
