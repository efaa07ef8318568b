use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::{FluidEngine, colormap::ColourMap};

/// Writes the current density field to PNG through a colour map, scaled up
/// to the output size with nearest-neighbour sampling.
pub struct FrameExporter {
    width: u32,
    height: u32,
}

impl FrameExporter {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn export_density_png(
        &self,
        engine: &impl FluidEngine,
        map: &ColourMap,
        interpolate: bool,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let img = self.render(engine, map, interpolate);
        img.save(path)?;
        Ok(())
    }

    fn render(&self, engine: &impl FluidEngine, map: &ColourMap, interpolate: bool) -> RgbImage {
        let mut img = ImageBuffer::new(self.width, self.height);

        let scale_x = self.width as f32 / engine.width() as f32;
        let scale_y = self.height as f32 / engine.height() as f32;
        let density = engine.density();

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let sim_x = (x as f32 / scale_x) as usize;
            let sim_y = (y as f32 / scale_y) as usize;

            if sim_x < engine.width() && sim_y < engine.height() {
                let sample = density[sim_y * engine.width() + sim_x];
                *pixel = Rgb(map.sample(sample, interpolate));
            } else {
                *pixel = Rgb([0, 0, 0]);
            }
        }

        img
    }
}
