use rayon::prelude::*;
use thiserror::Error;

use crate::FluidEngine;

pub const DEFAULT_RESOLUTION: usize = 100;
pub const MIN_RESOLUTION: usize = 8;
pub const MAX_RESOLUTION: usize = 1024;

const DENSITY_DIFFUSION: f32 = 0.005;
const VISCOSITY: f32 = 0.0005;

/// Failure to (re)build a simulation engine. The caller keeps the previous
/// engine running when this comes back.
#[derive(Debug, Error)]
pub enum ReinitError {
    #[error("resolution {requested} outside supported range {min}..={max}")]
    UnsupportedResolution {
        requested: usize,
        min: usize,
        max: usize,
    },
}

/// Grid fluid solver: diffusion, self-advection and pressure projection over
/// a square lattice, with painted sources injected at the start of each tick.
///
/// The paintable buffers (`density_source`, `source_u`, `source_v`) are
/// consumed by `tick`: their contents are added into the live fields once and
/// cleared, so a stamp acts as an impulse rather than a standing emitter.
#[derive(Debug, Clone)]
pub struct Fluid {
    width: usize,
    height: usize,
    u: Vec<f32>,
    v: Vec<f32>,
    u0: Vec<f32>,
    v0: Vec<f32>,
    d: Vec<f32>,
    d0: Vec<f32>,
    d_src: Vec<f32>,
    su: Vec<f32>,
    sv: Vec<f32>,
    dt: f32,
    iterations: u32,
}

impl Fluid {
    pub fn new(resolution: usize) -> Result<Self, ReinitError> {
        if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&resolution) {
            return Err(ReinitError::UnsupportedResolution {
                requested: resolution,
                min: MIN_RESOLUTION,
                max: MAX_RESOLUTION,
            });
        }
        Ok(Self::build(resolution))
    }

    fn build(resolution: usize) -> Self {
        let size = resolution * resolution;
        Self {
            width: resolution,
            height: resolution,
            u: vec![0.0; size],
            v: vec![0.0; size],
            u0: vec![0.0; size],
            v0: vec![0.0; size],
            d: vec![0.0; size],
            d0: vec![0.0; size],
            d_src: vec![0.0; size],
            su: vec![0.0; size],
            sv: vec![0.0; size],
            dt: 0.0001,
            iterations: 10,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn density(&self) -> &[f32] {
        &self.d
    }

    pub fn density_source(&self) -> &[f32] {
        &self.d_src
    }

    pub fn source_u(&self) -> &[f32] {
        &self.su
    }

    pub fn source_v(&self) -> &[f32] {
        &self.sv
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn set_dt(&mut self, dt: f32) {
        self.dt = dt;
    }

    pub fn set_iterations(&mut self, iterations: u32) {
        self.iterations = iterations.max(1);
    }

    /// One simulation step: inject painted sources, then run the velocity
    /// and density passes.
    pub fn tick(&mut self) {
        self.inject_sources();
        self.velocity_step();
        self.density_step();
    }

    fn inject_sources(&mut self) {
        for (u, s) in self.u.iter_mut().zip(&self.su) {
            *u += *s;
        }
        for (v, s) in self.v.iter_mut().zip(&self.sv) {
            *v += *s;
        }
        for (d, s) in self.d.iter_mut().zip(&self.d_src) {
            *d += *s;
        }
        self.su.fill(0.0);
        self.sv.fill(0.0);
        self.d_src.fill(0.0);
    }

    fn velocity_step(&mut self) {
        let (w, h) = (self.width, self.height);
        let a = self.dt * VISCOSITY * (w * h) as f32;

        std::mem::swap(&mut self.u, &mut self.u0);
        diffuse(
            &mut self.u,
            &self.u0,
            a,
            self.iterations,
            false,
            w,
            h,
            Boundary::NegativeX,
        );
        std::mem::swap(&mut self.v, &mut self.v0);
        diffuse(
            &mut self.v,
            &self.v0,
            a,
            self.iterations,
            false,
            w,
            h,
            Boundary::NegativeY,
        );

        // u0/v0 double as pressure and divergence scratch between passes.
        project(
            &mut self.u,
            &mut self.v,
            &mut self.u0,
            &mut self.v0,
            self.iterations,
            w,
            h,
        );

        std::mem::swap(&mut self.u, &mut self.u0);
        std::mem::swap(&mut self.v, &mut self.v0);
        advect(
            &mut self.u,
            &self.u0,
            &self.u0,
            &self.v0,
            self.dt,
            w,
            h,
            Boundary::NegativeX,
        );
        advect(
            &mut self.v,
            &self.v0,
            &self.u0,
            &self.v0,
            self.dt,
            w,
            h,
            Boundary::NegativeY,
        );

        project(
            &mut self.u,
            &mut self.v,
            &mut self.u0,
            &mut self.v0,
            self.iterations,
            w,
            h,
        );
    }

    fn density_step(&mut self) {
        let (w, h) = (self.width, self.height);
        let a = self.dt * DENSITY_DIFFUSION * (w * h) as f32;

        std::mem::swap(&mut self.d, &mut self.d0);
        diffuse(
            &mut self.d,
            &self.d0,
            a,
            self.iterations,
            true,
            w,
            h,
            Boundary::Neighbour,
        );
        std::mem::swap(&mut self.d, &mut self.d0);
        advect(
            &mut self.d,
            &self.d0,
            &self.u,
            &self.v,
            self.dt,
            w,
            h,
            Boundary::Neighbour,
        );
    }
}

impl Default for Fluid {
    fn default() -> Self {
        Self::build(DEFAULT_RESOLUTION)
    }
}

impl FluidEngine for Fluid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn tick(&mut self) {
        self.tick()
    }

    fn density(&self) -> &[f32] {
        &self.d
    }

    fn density_source_mut(&mut self) -> &mut [f32] {
        &mut self.d_src
    }

    fn velocity_sources_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.su, &mut self.sv)
    }

    fn set_dt(&mut self, dt: f32) {
        self.dt = dt;
    }

    fn set_iterations(&mut self, iterations: u32) {
        self.set_iterations(iterations)
    }
}

#[derive(PartialEq, Clone, Copy)]
enum Boundary {
    Neighbour,
    NegativeX,
    NegativeY,
}

#[inline(always)]
fn at(x: usize, y: usize, w: usize) -> usize {
    y * w + x
}

/// Gauss-Seidel relaxation of `x` towards `x0` with diffusion rate `a`.
/// Density clamps to [0, 1]; velocity components must keep their sign.
#[allow(clippy::too_many_arguments)]
fn diffuse(
    x: &mut [f32],
    x0: &[f32],
    a: f32,
    iterations: u32,
    clamp01: bool,
    w: usize,
    h: usize,
    boundary: Boundary,
) {
    for _ in 0..iterations {
        for j in 1..h - 1 {
            for i in 1..w - 1 {
                let idx = at(i, j, w);
                let neighbours = x[idx - 1] + x[idx + 1] + x[idx - w] + x[idx + w];
                let next = (x0[idx] + a * neighbours) / (1.0 + 4.0 * a);
                x[idx] = if clamp01 { next.clamp(0.0, 1.0) } else { next };
            }
        }
        set_boundary(x, boundary, w, h);
    }
}

/// Semi-Lagrangian advection: backtrace each cell through the velocity
/// field and bilinearly sample the previous values.
#[allow(clippy::too_many_arguments)]
fn advect(
    d: &mut [f32],
    d0: &[f32],
    u: &[f32],
    v: &[f32],
    dt: f32,
    w: usize,
    h: usize,
    boundary: Boundary,
) {
    let dt0x = dt * w as f32;
    let dt0y = dt * h as f32;

    d.par_chunks_mut(w)
        .enumerate()
        .skip(1)
        .take(h.saturating_sub(2))
        .for_each(|(j, row)| {
            for i in 1..w - 1 {
                let idx = at(i, j, w);
                let xp = (i as f32 - dt0x * u[idx]).clamp(1.5, w as f32 - 2.5);
                let yp = (j as f32 - dt0y * v[idx]).clamp(1.5, h as f32 - 2.5);
                let x0 = xp.floor() as usize;
                let x1 = x0 + 1;
                let y0 = yp.floor() as usize;
                let y1 = y0 + 1;
                let fx = xp - x0 as f32;
                let fy = yp - y0 as f32;

                row[i] = lerp(
                    lerp(d0[at(x0, y0, w)], d0[at(x0, y1, w)], fy),
                    lerp(d0[at(x1, y0, w)], d0[at(x1, y1, w)], fy),
                    fx,
                );
            }
        });

    set_boundary(d, boundary, w, h);
}

/// Clear divergence out of the velocity field. `p` and `div` are scratch
/// buffers overwritten here.
fn project(
    u: &mut [f32],
    v: &mut [f32],
    p: &mut [f32],
    div: &mut [f32],
    iterations: u32,
    w: usize,
    h: usize,
) {
    let hscale = 1.0 / w as f32;

    for j in 1..h - 1 {
        for i in 1..w - 1 {
            let idx = at(i, j, w);
            div[idx] = -0.5 * hscale * (u[idx + 1] - u[idx - 1] + v[idx + w] - v[idx - w]);
            p[idx] = 0.0;
        }
    }
    set_boundary(div, Boundary::Neighbour, w, h);
    set_boundary(p, Boundary::Neighbour, w, h);

    for _ in 0..iterations {
        for j in 1..h - 1 {
            for i in 1..w - 1 {
                let idx = at(i, j, w);
                p[idx] = (div[idx] + p[idx - 1] + p[idx + 1] + p[idx - w] + p[idx + w]) / 4.0;
            }
        }
        set_boundary(p, Boundary::Neighbour, w, h);
    }

    for j in 1..h - 1 {
        for i in 1..w - 1 {
            let idx = at(i, j, w);
            u[idx] -= 0.5 * (p[idx + 1] - p[idx - 1]) / hscale;
            v[idx] -= 0.5 * (p[idx + w] - p[idx - w]) / hscale;
        }
    }

    set_boundary(u, Boundary::NegativeX, w, h);
    set_boundary(v, Boundary::NegativeY, w, h);
}

/// Reflecting walls: edge cells copy their interior neighbour, with the
/// normal velocity component negated; corners average their two neighbours.
fn set_boundary(x: &mut [f32], boundary: Boundary, w: usize, h: usize) {
    let xm = if boundary == Boundary::NegativeX {
        -1.0
    } else {
        1.0
    };
    let ym = if boundary == Boundary::NegativeY {
        -1.0
    } else {
        1.0
    };

    for j in 1..h - 1 {
        x[at(0, j, w)] = xm * x[at(1, j, w)];
        x[at(w - 1, j, w)] = xm * x[at(w - 2, j, w)];
    }
    for i in 1..w - 1 {
        x[at(i, 0, w)] = ym * x[at(i, 1, w)];
        x[at(i, h - 1, w)] = ym * x[at(i, h - 2, w)];
    }

    x[at(0, 0, w)] = 0.5 * (x[at(1, 0, w)] + x[at(0, 1, w)]);
    x[at(w - 1, 0, w)] = 0.5 * (x[at(w - 2, 0, w)] + x[at(w - 1, 1, w)]);
    x[at(0, h - 1, w)] = 0.5 * (x[at(0, h - 2, w)] + x[at(1, h - 1, w)]);
    x[at(w - 1, h - 1, w)] = 0.5 * (x[at(w - 2, h - 1, w)] + x[at(w - 1, h - 2, w)]);
}

#[inline(always)]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
