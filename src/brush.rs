use glam::Vec2;

use crate::coords;

/// Peak value written at the centre of a density stamp.
const DENSITY_PEAK: f32 = 0.5;

/// Radial density brush. Overwrites the density source with a falloff that
/// peaks at 0.5 in the centre and fades towards zero at the rim. Overwrite
/// semantics: overlapping strokes in one pass do not accumulate, the last
/// write per cell wins.
pub fn stamp_density(dst: &mut [f32], width: usize, height: usize, centre: Vec2, radius: f32) {
    if dst.is_empty() {
        return;
    }
    for_each_cell(centre, radius, |pos, dist| {
        let i = coords::cell_index(pos.x, pos.y, width, height);
        dst[i] = DENSITY_PEAK * (1.0 - dist / radius);
    });
}

/// Velocity brush. Overwrites both velocity sources with one uniform drag
/// delta across the whole footprint - no falloff, unlike the density stamp.
pub fn stamp_velocity(
    su: &mut [f32],
    sv: &mut [f32],
    width: usize,
    height: usize,
    centre: Vec2,
    radius: f32,
    delta: Vec2,
) {
    if su.is_empty() || sv.is_empty() {
        return;
    }
    for_each_cell(centre, radius, |pos, _| {
        let i = coords::cell_index(pos.x, pos.y, width, height);
        su[i] = delta.x;
        sv[i] = delta.y;
    });
}

/// Walks the bounding square [centre-r, centre+r) in unit steps and yields
/// every position strictly inside the circular mask, with its distance from
/// the centre. A fractional centre probes fractional positions; flattening
/// to a cell happens in the callback via the clamped index. A radius of
/// zero or less yields nothing.
fn for_each_cell(centre: Vec2, radius: f32, mut visit: impl FnMut(Vec2, f32)) {
    let mut x = centre.x - radius;
    while x < centre.x + radius {
        let mut y = centre.y - radius;
        while y < centre.y + radius {
            let pos = Vec2::new(x, y);
            let dist = pos.distance(centre);
            if dist < radius {
                visit(pos, dist);
            }
            y += 1.0;
        }
        x += 1.0;
    }
}
