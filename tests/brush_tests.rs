use glam::Vec2;
use inkflow::brush::{stamp_density, stamp_velocity};

const W: usize = 100;
const H: usize = 100;

fn idx(x: usize, y: usize) -> usize {
    y * W + x
}

#[test]
fn test_density_falloff_profile() {
    // Sentinel fill so untouched cells are distinguishable from zero writes.
    let mut field = vec![-1.0f32; W * H];
    stamp_density(&mut field, W, H, Vec2::new(50.0, 50.0), 8.0);

    // Peak at the centre, fading towards the rim.
    assert_eq!(field[idx(50, 50)], 0.5);
    assert!((field[idx(44, 50)] - 0.125).abs() < 1e-4); // distance 6
    assert!((field[idx(57, 50)] - 0.0625).abs() < 1e-4); // distance 7

    // On and beyond the radius nothing is written.
    assert_eq!(field[idx(58, 50)], -1.0);
    assert_eq!(field[idx(42, 50)], -1.0);
    assert_eq!(field[idx(0, 0)], -1.0);
}

#[test]
fn test_density_overwrites_rather_than_accumulates() {
    let mut field = vec![0.9f32; W * H];
    stamp_density(&mut field, W, H, Vec2::new(50.0, 50.0), 8.0);
    assert_eq!(field[idx(50, 50)], 0.5);
}

#[test]
fn test_velocity_stamp_is_uniform() {
    let mut su = vec![0.0f32; W * H];
    let mut sv = vec![0.0f32; W * H];
    let delta = Vec2::new(3.5, -2.0);
    stamp_velocity(&mut su, &mut sv, W, H, Vec2::new(50.0, 50.0), 8.0, delta);

    let mut touched = 0;
    for i in 0..W * H {
        if su[i] != 0.0 || sv[i] != 0.0 {
            assert_eq!(su[i], 3.5);
            assert_eq!(sv[i], -2.0);
            touched += 1;
        }
    }

    // Roughly the area of a radius-8 disk.
    assert!(
        (150..=220).contains(&touched),
        "unexpected footprint size {touched}"
    );
}

#[test]
fn test_degenerate_radius_is_noop() {
    let mut field = vec![0.0f32; W * H];
    stamp_density(&mut field, W, H, Vec2::new(50.0, 50.0), 0.0);
    stamp_density(&mut field, W, H, Vec2::new(50.0, 50.0), -4.0);
    assert!(field.iter().all(|&v| v == 0.0));
}

#[test]
fn test_out_of_bounds_centre_clamps() {
    let mut field = vec![0.0f32; W * H];
    // Strokes near the edge probe negative coordinates; the index clamp
    // keeps every write in range.
    stamp_density(&mut field, W, H, Vec2::new(-5.0, -5.0), 8.0);
    stamp_density(&mut field, W, H, Vec2::new(105.0, 105.0), 8.0);
    assert!(field.iter().any(|&v| v > 0.0));
}

#[test]
fn test_empty_buffer_is_noop() {
    let mut field: Vec<f32> = Vec::new();
    stamp_density(&mut field, 0, 0, Vec2::new(5.0, 5.0), 8.0);

    let mut su: Vec<f32> = Vec::new();
    let mut sv: Vec<f32> = Vec::new();
    stamp_velocity(&mut su, &mut sv, 0, 0, Vec2::new(5.0, 5.0), 8.0, Vec2::ONE);
}

#[test]
fn test_fractional_centre() {
    let mut field = vec![0.0f32; W * H];
    stamp_density(&mut field, W, H, Vec2::new(50.5, 50.5), 8.0);
    // The probe positions are offset by the fractional part, so the exact
    // centre cell is never at distance zero, but it is still the peak.
    let centre = field[idx(50, 50)];
    assert!(centre > 0.4 && centre <= 0.5, "centre = {centre}");
}
