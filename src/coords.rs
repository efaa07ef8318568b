use glam::Vec2;

/// Maps canvas pixel coordinates onto the simulation grid.
///
/// Built fresh from the current canvas size and grid dimensions at each use,
/// so a resolution change can never leave stale cell sizes behind.
#[derive(Debug, Clone, Copy)]
pub struct CanvasMap {
    cell_w: f32,
    cell_h: f32,
    width: usize,
    height: usize,
}

impl CanvasMap {
    pub fn new(canvas_size: Vec2, width: usize, height: usize) -> Self {
        Self {
            cell_w: canvas_size.x / width.max(1) as f32,
            cell_h: canvas_size.y / height.max(1) as f32,
            width,
            height,
        }
    }

    /// Canvas pixels to fractional grid coordinates. No rounding; callers
    /// floor or round as their use requires.
    pub fn to_grid(&self, pos: Vec2) -> Vec2 {
        Vec2::new(pos.x / self.cell_w, pos.y / self.cell_h)
    }

    /// Fractional grid coordinates back to canvas pixels.
    pub fn to_canvas(&self, grid: Vec2) -> Vec2 {
        Vec2::new(grid.x * self.cell_w, grid.y * self.cell_h)
    }

    pub fn cell_index(&self, gx: f32, gy: f32) -> usize {
        cell_index(gx, gy, self.width, self.height)
    }
}

/// Flatten fractional grid coordinates to a clamped row-major index.
///
/// The raw `floor(gy)*width + floor(gx)` is computed first and clamped as a
/// whole, so a coordinate slightly outside one edge lands on a neighbouring
/// cell rather than out of range. Brush strokes near the border probe
/// negative and overflowing coordinates as a matter of course; this must
/// never panic, for any finite or non-finite input.
pub fn cell_index(gx: f32, gy: f32, width: usize, height: usize) -> usize {
    let len = width as i64 * height as i64;
    if len == 0 {
        return 0;
    }
    let raw = (gy.floor() as i64)
        .saturating_mul(width as i64)
        .saturating_add(gx.floor() as i64);
    raw.clamp(0, len - 1) as usize
}
