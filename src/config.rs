use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

use crate::colormap::ColourMap;

/// Which setting changed. Subscribers use the kind to decide between a
/// parameter push and a full re-initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
    Dt,
    Iterations,
    Resolution,
    ColourMap,
    Interpolation,
    BrushRadius,
}

impl SettingChange {
    /// Grid dimensions are fixed when an engine is built, so a resolution
    /// change forces the engine and frame buffer to be rebuilt. Everything
    /// else is either pushed as a parameter or read directly by its
    /// consumer on next use.
    pub fn requires_reinit(self) -> bool {
        matches!(self, SettingChange::Resolution)
    }
}

/// The tunable state of the whole front end. Mutated in place through the
/// bus and read by consumers on every frame or event; there is no
/// snapshotting, a change is visible to any later read in the same frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub colour_map: ColourMap,
    pub dt: f32,
    pub colourmap_interpolation: bool,
    pub resolution: usize,
    pub iterations: u32,
    pub brush_radius: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            colour_map: ColourMap::blues(),
            dt: 0.0001,
            colourmap_interpolation: true,
            resolution: 100,
            iterations: 10,
            brush_radius: 8.0,
        }
    }
}

/// Owns the settings record and notifies subscribers after every mutation.
pub struct SettingsBus {
    settings: Settings,
    subscribers: Vec<Sender<SettingChange>>,
}

impl SettingsBus {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            subscribers: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register a listener. Dropped receivers are pruned on the next
    /// notification.
    pub fn subscribe(&mut self) -> Receiver<SettingChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Mutate one field and broadcast the change kind to all live
    /// subscribers.
    pub fn update(&mut self, change: SettingChange, apply: impl FnOnce(&mut Settings)) {
        apply(&mut self.settings);
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }

    pub fn set_dt(&mut self, dt: f32) {
        self.update(SettingChange::Dt, |s| s.dt = dt);
    }

    pub fn set_iterations(&mut self, iterations: u32) {
        self.update(SettingChange::Iterations, |s| s.iterations = iterations);
    }

    pub fn set_resolution(&mut self, resolution: usize) {
        self.update(SettingChange::Resolution, |s| s.resolution = resolution);
    }

    pub fn set_colour_map(&mut self, map: ColourMap) {
        self.update(SettingChange::ColourMap, |s| s.colour_map = map);
    }

    pub fn set_interpolation(&mut self, on: bool) {
        self.update(SettingChange::Interpolation, |s| {
            s.colourmap_interpolation = on
        });
    }

    pub fn set_brush_radius(&mut self, radius: f32) {
        self.update(SettingChange::BrushRadius, |s| s.brush_radius = radius);
    }
}
