use glam::Vec2;
use inkflow::colormap::ColourMap;
use inkflow::coords::{CanvasMap, cell_index};

#[test]
fn test_to_grid_divides_by_cell_size() {
    let map = CanvasMap::new(Vec2::new(400.0, 400.0), 100, 100);
    let grid = map.to_grid(Vec2::new(200.0, 100.0));
    assert_eq!(grid, Vec2::new(50.0, 25.0));

    // Fractional coordinates stay fractional; callers round as needed.
    let grid = map.to_grid(Vec2::new(202.0, 102.0));
    assert_eq!(grid, Vec2::new(50.5, 25.5));

    // And back out to canvas pixels.
    assert_eq!(map.to_canvas(grid), Vec2::new(202.0, 102.0));
}

#[test]
fn test_canvas_map_cell_index() {
    let map = CanvasMap::new(Vec2::new(400.0, 400.0), 100, 100);
    assert_eq!(map.cell_index(50.0, 2.0), 250);
    assert_eq!(map.cell_index(-20.0, -20.0), 0);
}

#[test]
fn test_cell_index_row_major() {
    assert_eq!(cell_index(50.0, 2.0, 100, 100), 250);
    assert_eq!(cell_index(50.7, 2.3, 100, 100), 250);
    assert_eq!(cell_index(0.0, 0.0, 100, 100), 0);
    assert_eq!(cell_index(99.9, 99.9, 100, 100), 9999);
}

#[test]
fn test_cell_index_clamps_out_of_range() {
    let len = 100 * 100;
    for &(gx, gy) in &[
        (-1.0, 0.0),
        (-1000.0, -1000.0),
        (1e9, 1e9),
        (f32::NEG_INFINITY, 0.0),
        (f32::INFINITY, f32::INFINITY),
        (f32::NAN, f32::NAN),
        (50.0, -3.0),
        (150.0, 99.0),
    ] {
        let idx = cell_index(gx, gy, 100, 100);
        assert!(idx < len, "index {idx} out of range for ({gx}, {gy})");
    }

    assert_eq!(cell_index(-1000.0, -1000.0, 100, 100), 0);
    assert_eq!(cell_index(1e9, 1e9, 100, 100), len - 1);
}

#[test]
fn test_colourmap_endpoints() {
    let map = ColourMap::blues();
    assert_eq!(map.sample(0.0, true), [255, 255, 204]);
    assert_eq!(map.sample(0.0, false), [255, 255, 204]);
    // Top of the range never indexes past the last stop.
    map.sample(0.999, true);
    map.sample(1.0, true);
    map.sample(5.0, true);
}

#[test]
fn test_colourmap_interpolation_blends() {
    let map = ColourMap::new(vec![[0, 0, 0], [200, 100, 50]]);
    assert_eq!(map.sample(0.5, true), [100, 50, 12]);

    // Near the top the result sits strictly between the two stops.
    let [r, g, _] = map.sample(0.999, true);
    assert!(r > 0 && r < 200, "r = {r}");
    assert!(g > 0 && g < 100, "g = {g}");
}

#[test]
fn test_colourmap_stepped_returns_literal_stops() {
    let map = ColourMap::blues();
    for i in 0..100 {
        let colour = map.sample(i as f32 / 100.0, false);
        assert!(
            map.stops().contains(&colour),
            "stepped sampling produced a blended colour {colour:?}"
        );
    }
    // Stepped mode picks nearest-below, not nearest.
    assert_eq!(map.sample(0.24, false), [255, 255, 204]);
}

#[test]
fn test_colourmap_single_stop() {
    let map = ColourMap::new(vec![[7, 8, 9]]);
    for i in 0..10 {
        let x = i as f32 / 10.0;
        assert_eq!(map.sample(x, true), [7, 8, 9]);
        assert_eq!(map.sample(x, false), [7, 8, 9]);
    }
}

#[test]
fn test_colourmap_empty_stop_list_degrades() {
    let map = ColourMap::new(Vec::new());
    assert_eq!(map.sample(0.5, true), [0, 0, 0]);
}

#[test]
fn test_colourmap_unclamped_samples() {
    let map = ColourMap::blues();
    assert_eq!(map.sample(-3.0, true), [255, 255, 204]);
    assert_eq!(map.sample(42.0, false), [44, 127, 184]);
}
