//! The **Film** accumulates the XYZ estimates of every pixel. Worker
//! threads render into **FilmTile**s which the collecting thread
//! merges; when rendering is done the film converts to sRGB and
//! writes an 8-bit image.

// std
use std::path::Path;
// jmist
use crate::blockqueue::Tile;
use crate::core::error::RenderError;
use crate::core::jmist::{clamp_t, gamma_correct, Float};
use crate::core::spectrum::xyz_to_rgb;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Pixel {
    xyz: [Float; 3],
    weight_sum: Float,
}

#[derive(Debug, Clone)]
pub struct FilmTile {
    pub bounds: Tile,
    pixels: Vec<Pixel>,
}

impl FilmTile {
    pub fn new(bounds: Tile) -> Self {
        FilmTile {
            bounds,
            pixels: vec![Pixel::default(); bounds.area()],
        }
    }
    /// Adds one XYZ estimate for the pixel at `(x, y)` in image
    /// coordinates.
    pub fn add_sample(&mut self, x: u32, y: u32, xyz: &[Float; 3]) {
        let index: usize = self.get_pixel_index(x, y);
        let pixel: &mut Pixel = &mut self.pixels[index];
        for i in 0..3 {
            pixel.xyz[i] += xyz[i];
        }
        pixel.weight_sum += 1.0;
    }
    fn get_pixel_index(&self, x: u32, y: u32) -> usize {
        debug_assert!(self.bounds.contains(x, y));
        pixel_offset(
            self.bounds.x1 - self.bounds.x0,
            x - self.bounds.x0,
            y - self.bounds.y0,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Film {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Pixel>,
}

impl Film {
    pub fn new(width: u32, height: u32) -> Self {
        Film {
            width,
            height,
            pixels: vec![Pixel::default(); width as usize * height as usize],
        }
    }
    pub fn aspect(&self) -> Float {
        self.width as Float / self.height as Float
    }
    pub fn merge_film_tile(&mut self, tile: &FilmTile) {
        let b = &tile.bounds;
        for y in b.y0..b.y1 {
            for x in b.x0..b.x1 {
                let src: &Pixel = &tile.pixels[tile.get_pixel_index(x, y)];
                let dst: &mut Pixel = &mut self.pixels[pixel_offset(self.width, x, y)];
                for i in 0..3 {
                    dst.xyz[i] += src.xyz[i];
                }
                dst.weight_sum += src.weight_sum;
            }
        }
    }
    /// The averaged XYZ value of a pixel.
    pub fn get_pixel(&self, x: u32, y: u32) -> [Float; 3] {
        let pixel: &Pixel = &self.pixels[pixel_offset(self.width, x, y)];
        if pixel.weight_sum == 0.0 {
            return [0.0; 3];
        }
        let inv_wt: Float = 1.0 / pixel.weight_sum;
        [
            pixel.xyz[0] * inv_wt,
            pixel.xyz[1] * inv_wt,
            pixel.xyz[2] * inv_wt,
        ]
    }
    /// Converts to gamma corrected 8-bit sRGB.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut buffer: Vec<u8> = Vec::with_capacity(3 * self.pixels.len());
        for y in 0..self.height {
            for x in 0..self.width {
                let rgb: [Float; 3] = xyz_to_rgb(&self.get_pixel(x, y));
                for c in rgb.iter() {
                    // 8-bit format; apply gamma
                    buffer.push(
                        clamp_t(255.0 * gamma_correct(c.max(0.0)) + 0.5, 0.0, 255.0) as u8,
                    );
                }
            }
        }
        buffer
    }
    pub fn write_image(&self, path: &Path) -> Result<(), RenderError> {
        log::info!(
            "Writing image {:?} with resolution {}x{}",
            path,
            self.width,
            self.height
        );
        image::save_buffer(
            path,
            &self.to_rgb8(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )?;
        Ok(())
    }
}

/// Row-major offset of pixel `(x, y)` in an image `width` wide.
fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn merged_tiles_average_their_samples() {
        let mut film = Film::new(4, 2);
        let mut tile = FilmTile::new(Tile::new(2, 0, 4, 2));
        tile.add_sample(3, 1, &[1.0, 2.0, 3.0]);
        tile.add_sample(3, 1, &[3.0, 2.0, 1.0]);
        film.merge_film_tile(&tile);
        assert_eq!(film.get_pixel(3, 1), [2.0, 2.0, 2.0]);
        assert_eq!(film.get_pixel(0, 0), [0.0, 0.0, 0.0]);
        assert_eq!(film.to_rgb8().len(), 24);
    }

    #[test]
    fn offsets_do_not_wrap_for_large_images() {
        assert_eq!(pixel_offset(100_000, 7, 50_000), 5_000_000_007);
        assert_eq!(pixel_offset(4, 3, 1), 7);
    }
}
