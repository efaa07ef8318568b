use rayon::prelude::*;

use crate::colormap::ColourMap;

/// RGBA frame buffer sized to the simulation grid: one 4-byte pixel per
/// cell, row-major, ready to blit as a single texture.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Rasterize a scalar field through the colour map, row-major, with
    /// opaque alpha. A sample buffer shorter than the grid leaves the
    /// remaining pixels untouched rather than panicking.
    pub fn rasterize(&mut self, samples: &[f32], map: &ColourMap, interpolate: bool) {
        let w = self.width;
        if w == 0 || self.height == 0 {
            return;
        }

        self.rgba
            .par_chunks_mut(w * 4)
            .enumerate()
            .for_each(|(j, row)| {
                for i in 0..w {
                    let Some(&sample) = samples.get(j * w + i) else {
                        break;
                    };
                    let [r, g, b] = map.sample(sample, interpolate);
                    let px = i * 4;
                    row[px] = r;
                    row[px + 1] = g;
                    row[px + 2] = b;
                    row[px + 3] = 255;
                }
            });
    }
}
