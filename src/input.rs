use glam::Vec2;

use crate::{FluidEngine, brush};

/// Displacement (in grid units) below which a move is treated as pointer
/// jitter and stamps nothing.
pub const MOTION_THRESHOLD: f32 = 0.01;

/// Tracks the pointer across press/drag/release and turns motion into brush
/// stamps.
///
/// The stored position survives a release on purpose: deltas are measured
/// from the last *processed* sample, wherever it was, so drift never resets
/// mid-stroke. The first move after a press far from the previous release
/// point therefore produces one large delta.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last_pos: Option<Vec2>,
    button_down: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self) {
        self.button_down = true;
    }

    pub fn release(&mut self) {
        self.button_down = false;
    }

    pub fn is_down(&self) -> bool {
        self.button_down
    }

    pub fn last_pos(&self) -> Option<Vec2> {
        self.last_pos
    }

    /// Handle pointer motion at `pos`, in grid space.
    ///
    /// When a previous position exists and the displacement clears the
    /// jitter threshold, the delta is stamped into the velocity sources at
    /// the current position - and, while the button is held, a density stamp
    /// lands there too. The stored position is updated on every move
    /// regardless, so the next delta is measured from this sample.
    pub fn moved(&mut self, engine: &mut impl FluidEngine, pos: Vec2, brush_radius: f32) {
        if let Some(last) = self.last_pos {
            let delta = pos - last;
            if delta.length() > MOTION_THRESHOLD {
                let (w, h) = (engine.width(), engine.height());
                let (su, sv) = engine.velocity_sources_mut();
                brush::stamp_velocity(su, sv, w, h, pos, brush_radius, delta);

                if self.button_down {
                    brush::stamp_density(engine.density_source_mut(), w, h, pos, brush_radius);
                }
            }
        }
        self.last_pos = Some(pos);
    }

    /// A direct click paints one density stamp at `pos`. Needs no prior
    /// position and computes no delta.
    pub fn clicked(&self, engine: &mut impl FluidEngine, pos: Vec2, brush_radius: f32) {
        let (w, h) = (engine.width(), engine.height());
        brush::stamp_density(engine.density_source_mut(), w, h, pos, brush_radius);
    }
}
