use std::sync::mpsc::Receiver;

use glam::Vec2;

use crate::{
    FluidEngine, brush,
    config::{SettingChange, Settings},
    coords::CanvasMap,
    fluid::{Fluid, ReinitError},
    input::PointerTracker,
    render::FrameBuffer,
};

/// Owns one engine / frame-buffer pair and drives the advance-sample-
/// rasterize cycle. The hosting app calls `apply_changes` and `advance`
/// once per display frame and blits `frame().rgba()`; tests drive the same
/// methods directly for deterministic single-stepping.
pub struct Session {
    engine: Fluid,
    frame: FrameBuffer,
    pointer: PointerTracker,
    changes: Receiver<SettingChange>,
}

impl Session {
    pub fn new(settings: &Settings, changes: Receiver<SettingChange>) -> Result<Self, ReinitError> {
        let mut engine = Fluid::new(settings.resolution)?;
        engine.set_dt(settings.dt);
        engine.set_iterations(settings.iterations);
        let frame = FrameBuffer::new(engine.width(), engine.height());
        Ok(Self {
            engine,
            frame,
            pointer: PointerTracker::new(),
            changes,
        })
    }

    pub fn engine(&self) -> &Fluid {
        &self.engine
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    /// Drain pending setting changes. `dt` and `iterations` are pushed to
    /// the engine whenever anything changed; a resolution change swaps in a
    /// freshly built engine and frame buffer. The replacement pair is fully
    /// constructed before the old one is dropped, so a failed rebuild
    /// returns the error and leaves the running pair untouched.
    pub fn apply_changes(&mut self, settings: &Settings) -> Result<(), ReinitError> {
        let mut any = false;
        let mut reinit = false;
        while let Ok(change) = self.changes.try_recv() {
            any = true;
            reinit |= change.requires_reinit();
        }
        if !any {
            return Ok(());
        }

        if reinit
            && (settings.resolution != self.engine.width()
                || settings.resolution != self.engine.height())
        {
            let engine = Fluid::new(settings.resolution)?;
            let frame = FrameBuffer::new(engine.width(), engine.height());
            self.engine = engine;
            self.frame = frame;
            log::info!(
                "engine re-initialized at {}x{}",
                self.engine.width(),
                self.engine.height()
            );
        }

        self.engine.set_dt(settings.dt);
        self.engine.set_iterations(settings.iterations);
        Ok(())
    }

    /// One render-loop cycle: advance the simulation, then rasterize the
    /// density field through the active colour map. Blitting the buffer is
    /// the caller's side of the contract, after which the caller reschedules
    /// the next cycle.
    pub fn advance(&mut self, settings: &Settings) {
        self.engine.tick();
        self.frame.rasterize(
            self.engine.density(),
            &settings.colour_map,
            settings.colourmap_interpolation,
        );
    }

    pub fn pointer_pressed(&mut self) {
        self.pointer.press();
    }

    pub fn pointer_released(&mut self) {
        self.pointer.release();
    }

    /// Pointer motion at `pos` (canvas pixels) over a canvas of
    /// `canvas_size`. The canvas-to-grid mapping is rebuilt from the current
    /// engine dimensions on every event.
    pub fn pointer_moved(&mut self, canvas_size: Vec2, pos: Vec2, settings: &Settings) {
        let map = CanvasMap::new(canvas_size, self.engine.width(), self.engine.height());
        let grid = map.to_grid(pos);
        self.pointer.moved(&mut self.engine, grid, settings.brush_radius);
    }

    /// A direct click in canvas pixels: one density stamp, no delta.
    pub fn pointer_clicked(&mut self, canvas_size: Vec2, pos: Vec2, settings: &Settings) {
        let map = CanvasMap::new(canvas_size, self.engine.width(), self.engine.height());
        let grid = map.to_grid(pos);
        self.pointer
            .clicked(&mut self.engine, grid, settings.brush_radius);
    }

    /// One-shot density stamp in grid space, bypassing pointer tracking.
    pub fn paint_density(&mut self, grid: Vec2, radius: f32) {
        let (w, h) = (self.engine.width(), self.engine.height());
        brush::stamp_density(self.engine.density_source_mut(), w, h, grid, radius);
    }
}
