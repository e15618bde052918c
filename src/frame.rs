use crate::geometry::{ScreenPoint, ScreenSize};
use crate::screen_block::ScreenBlock;

/// Rendered frame, 4 bytes per pixel in B, G, R, A order, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BgraImage {
    size: ScreenSize,
    data: Vec<u8>,
}

impl BgraImage {
    /// Creates a transparent black image.
    pub fn new(size: ScreenSize) -> Self {
        BgraImage {
            size,
            data: vec![0; 4 * size.x as usize * size.y as usize],
        }
    }

    pub fn size(&self) -> ScreenSize {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, point: &ScreenPoint) -> usize {
        4 * (point.y as usize * self.size.x as usize + point.x as usize)
    }

    pub fn pixel(&self, point: &ScreenPoint) -> [u8; 4] {
        let offset = self.offset(point);
        let mut pixel = [0; 4];
        pixel.copy_from_slice(&self.data[offset..offset + 4]);
        pixel
    }

    pub fn put_pixel(&mut self, point: &ScreenPoint, pixel: [u8; 4]) {
        let offset = self.offset(point);
        self.data[offset..offset + 4].copy_from_slice(&pixel);
    }

    /// Copies densely packed pixels of a tile (row by row) into the image.
    pub fn write_tile(&mut self, tile: &ScreenBlock, pixels: &[[u8; 4]]) {
        let width = tile.width() as usize;
        debug_assert_eq!(pixels.len(), tile.area());

        for (row, src) in pixels.chunks_exact(width).enumerate() {
            let start = self.offset(&ScreenPoint::new(tile.min.x, tile.min.y + row as u32));
            self.data[start..start + 4 * width].copy_from_slice(bytemuck::cast_slice(src));
        }
    }

    /// Converts to an RGBA image for saving or display.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.size.x, self.size.y, |x, y| {
            let [b, g, r, a] = self.pixel(&ScreenPoint::new(x, y));
            image::Rgba([r, g, b, a])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;

    #[test]
    fn pixel_offsets() {
        let mut image = BgraImage::new(ScreenSize::new(3, 2));
        assert!(image.as_bytes().len() == 24);

        image.put_pixel(&ScreenPoint::new(1, 1), [1, 2, 3, 4]);
        assert!(image.as_bytes()[16..20] == [1, 2, 3, 4]);
        assert!(image.pixel(&ScreenPoint::new(1, 1)) == [1, 2, 3, 4]);
    }

    #[test]
    fn tile_lands_in_place() {
        let mut image = BgraImage::new(ScreenSize::new(4, 4));
        let tile = ScreenBlock::new(ScreenPoint::new(1, 2), ScreenPoint::new(3, 4));
        let pixels = [[1, 1, 1, 1], [2, 2, 2, 2], [3, 3, 3, 3], [4, 4, 4, 4]];
        image.write_tile(&tile, &pixels);

        assert!(image.pixel(&ScreenPoint::new(1, 2)) == [1, 1, 1, 1]);
        assert!(image.pixel(&ScreenPoint::new(2, 2)) == [2, 2, 2, 2]);
        assert!(image.pixel(&ScreenPoint::new(1, 3)) == [3, 3, 3, 3]);
        assert!(image.pixel(&ScreenPoint::new(2, 3)) == [4, 4, 4, 4]);
        assert!(image.pixel(&ScreenPoint::new(0, 2)) == [0, 0, 0, 0]);
        assert!(image.pixel(&ScreenPoint::new(3, 3)) == [0, 0, 0, 0]);
    }

    #[test]
    fn rgba_conversion_swaps_channels() {
        let mut image = BgraImage::new(ScreenSize::new(1, 1));
        image.put_pixel(&ScreenPoint::new(0, 0), [0, 0, 255, 255]);
        assert!(image.to_rgba_image().get_pixel(0, 0).0 == [255, 0, 0, 255]);
    }
}
